//! Spatial hash grid for neighbour search
//!
//! Rebuilt from scratch every frame. Particles are keyed by the hash of their
//! cell, sorted once into a flat index array, and each distinct hash owns a
//! contiguous range of that array. The backing vectors are reused between
//! frames, so a rebuild does not allocate once the particle count settles.

use std::ops::Range;

use crate::core::kernel::{CellHash, NEIGHBOR_COUNT, cell_from_position, hash_cell, neighbor_cells};
use crate::core::stage::{Hashed, StageToken};
use crate::math::{CellCoord, Real, Vector};

#[derive(Clone, Debug, Default)]
pub struct SpatialHashGrid {
    cell_size: Real,
    // (hash, particle index) scratch, sorted during rebuild
    keys: Vec<(CellHash, usize)>,
    order: Vec<usize>,
    buckets: Vec<(CellHash, Range<usize>)>,
}

impl SpatialHashGrid {
    pub fn new(cell_size: Real) -> Self {
        Self {
            cell_size,
            ..Default::default()
        }
    }

    pub fn cell_size(&self) -> Real {
        self.cell_size
    }

    /// Takes effect at the next rebuild.
    pub fn set_cell_size(&mut self, cell_size: Real) {
        self.cell_size = cell_size;
    }

    /// Number of indexed particles.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of distinct non-empty hashes.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn cell_of(&self, position: Vector) -> CellCoord {
        cell_from_position(position, self.cell_size)
    }

    /// Discard the previous frame and file every particle under its cell hash.
    ///
    /// Within a bucket particles appear in ascending index order, so the
    /// result only depends on the input order.
    pub fn rebuild(&mut self, positions: &[Vector], frame: u64) -> StageToken<Hashed> {
        self.keys.clear();
        self.order.clear();
        self.buckets.clear();

        let cell_size = self.cell_size;
        self.keys.extend(
            positions
                .iter()
                .enumerate()
                .map(|(idx, &position)| (hash_cell(cell_from_position(position, cell_size)), idx)),
        );
        self.keys.sort_unstable();
        self.order.extend(self.keys.iter().map(|&(_, idx)| idx));

        let mut current: Option<(CellHash, usize)> = None;
        for (sorted_idx, &(hash, _)) in self.keys.iter().enumerate() {
            match current {
                Some((bucket_hash, start)) if bucket_hash != hash => {
                    self.buckets.push((bucket_hash, start..sorted_idx));
                    current = Some((hash, sorted_idx));
                }
                None => current = Some((hash, sorted_idx)),
                _ => {}
            }
        }
        if let Some((hash, start)) = current {
            self.buckets.push((hash, start..self.keys.len()));
        }

        StageToken::begin(frame)
    }

    /// Hashes of `cell` and its eight neighbours.
    pub fn neighbor_buckets(&self, cell: CellCoord) -> [CellHash; NEIGHBOR_COUNT] {
        neighbor_cells(cell).map(hash_cell)
    }

    /// Particles filed under `hash`. Unknown hashes are empty.
    pub fn bucket(&self, hash: CellHash) -> &[usize] {
        match self.buckets.binary_search_by_key(&hash, |(h, _)| *h) {
            Ok(pos) => &self.order[self.buckets[pos].1.clone()],
            Err(_) => &[],
        }
    }

    /// Visit every particle in the 3x3 block around `position`'s cell.
    ///
    /// This is a superset of the particles within one cell size: hash
    /// aliasing can add distant particles, callers filter by distance. A hash
    /// shared by two cells of the block is scanned once.
    #[inline]
    pub fn for_each_candidate<F>(&self, position: Vector, mut f: F)
    where
        F: FnMut(usize),
    {
        let hashes = self.neighbor_buckets(self.cell_of(position));
        for (i, &hash) in hashes.iter().enumerate() {
            if hashes[..i].contains(&hash) {
                continue;
            }
            for &idx in self.bucket(hash) {
                f(idx);
            }
        }
    }

    /// Indices of all candidates around `position`, mostly for inspection.
    pub fn candidates(&self, position: Vector) -> Vec<usize> {
        let mut out = Vec::new();
        self.for_each_candidate(position, |idx| out.push(idx));
        out
    }
}
