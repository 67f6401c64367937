use std::f32::consts::PI;

use bevy::prelude::IVec2;

use crate::math::{CellCoord, Real, Vector};

/// Hash of a grid cell. Distinct cells may share a hash.
pub type CellHash = i32;

const HASH_PRIME_X: i32 = 73_856_093;
const HASH_PRIME_Y: i32 = 19_349_663;

pub const NEIGHBOR_COUNT: usize = 9;

/// The cell itself and its eight neighbours.
pub const NEIGHBOR_OFFSETS: [IVec2; NEIGHBOR_COUNT] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, -1),
    IVec2::new(0, 0),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
];

/// Normalisation constants of the 2D poly6, spiky-gradient and viscosity
/// Laplacian kernels for a support radius `h`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelCoefficients {
    pub h: Real,
    pub h_sq: Real,
    /// `4 / (pi h^8)`, multiplies `(h^2 - r^2)^3`.
    pub poly6: Real,
    /// `-10 / (pi h^5)`, multiplies `(h - r)^3`.
    pub spiky_grad: Real,
    /// `40 / (pi h^5)`, multiplies `(h - r)`.
    pub visc_lap: Real,
}

impl KernelCoefficients {
    pub fn new(h: Real) -> Self {
        Self {
            h,
            h_sq: h * h,
            poly6: 4.0 / (PI * h.powi(8)),
            spiky_grad: -10.0 / (PI * h.powi(5)),
            visc_lap: 40.0 / (PI * h.powi(5)),
        }
    }

    /// Density kernel for a squared distance. Zero outside the support.
    #[inline(always)]
    pub fn poly6(&self, r_sq: Real) -> Real {
        if r_sq >= self.h_sq {
            return 0.0;
        }
        let diff = self.h_sq - r_sq;
        self.poly6 * diff * diff * diff
    }

    /// Radial factor of the spiky gradient at distance `r`.
    #[inline(always)]
    pub fn spiky_grad(&self, r: Real) -> Real {
        if r >= self.h {
            return 0.0;
        }
        let diff = self.h - r;
        self.spiky_grad * diff * diff * diff
    }

    #[inline(always)]
    pub fn visc_lap(&self, r: Real) -> Real {
        if r >= self.h {
            return 0.0;
        }
        self.visc_lap * (self.h - r)
    }
}

/// Grid cell containing `position`, flooring so negative coordinates land in
/// negative cells.
#[inline]
pub fn cell_from_position(position: Vector, cell_size: Real) -> CellCoord {
    let inv = 1.0 / cell_size;
    IVec2::new(
        (position.x * inv).floor() as i32,
        (position.y * inv).floor() as i32,
    )
}

#[inline]
pub fn hash_cell(cell: CellCoord) -> CellHash {
    cell.x.wrapping_mul(HASH_PRIME_X) ^ cell.y.wrapping_mul(HASH_PRIME_Y)
}

#[inline]
pub fn neighbor_cells(cell: CellCoord) -> [CellCoord; NEIGHBOR_COUNT] {
    NEIGHBOR_OFFSETS.map(|offset| cell + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec2;

    #[test]
    fn poly6_peaks_at_origin_and_vanishes_at_support() {
        let k = KernelCoefficients::new(2.0);
        let w0 = k.poly6(0.0);
        assert!((w0 - k.poly6 * 64.0).abs() < 1e-9);
        assert!(k.poly6(1.0) < w0);
        assert_eq!(k.poly6(4.0), 0.0);
        assert_eq!(k.poly6(9.0), 0.0);
    }

    #[test]
    fn gradient_and_laplacian_signs() {
        let k = KernelCoefficients::new(1.0);
        assert!(k.spiky_grad(0.5) < 0.0);
        assert!(k.visc_lap(0.5) > 0.0);
        assert_eq!(k.spiky_grad(1.0), 0.0);
        assert_eq!(k.visc_lap(1.5), 0.0);
    }

    #[test]
    fn cells_floor_negative_positions() {
        assert_eq!(cell_from_position(Vec2::new(0.5, 15.9), 16.0), IVec2::new(0, 0));
        assert_eq!(cell_from_position(Vec2::new(16.0, 33.0), 16.0), IVec2::new(1, 2));
        assert_eq!(cell_from_position(Vec2::new(-0.1, -16.0), 16.0), IVec2::new(-1, -1));
    }

    #[test]
    fn hash_matches_prime_xor() {
        assert_eq!(hash_cell(IVec2::ZERO), 0);
        assert_eq!(hash_cell(IVec2::new(1, 0)), HASH_PRIME_X);
        assert_eq!(hash_cell(IVec2::new(1, 1)), HASH_PRIME_X ^ HASH_PRIME_Y);
        // Wraps instead of overflowing.
        let far = IVec2::new(i32::MAX / 7, -(i32::MAX / 11));
        assert_eq!(
            hash_cell(far),
            far.x.wrapping_mul(73_856_093) ^ far.y.wrapping_mul(19_349_663)
        );
        assert_ne!(hash_cell(far), 0);
    }

    #[test]
    fn neighbourhood_is_three_by_three() {
        let cells = neighbor_cells(IVec2::new(5, -2));
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&IVec2::new(5, -2)));
        assert!(cells.contains(&IVec2::new(4, -3)));
        assert!(cells.contains(&IVec2::new(6, -1)));
    }
}
