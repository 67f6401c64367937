//! Spawn regions for batch particle insertion.
//!
//! Particles are laid on a square lattice over the shape's bounding box, rows
//! bottom to top and left to right within a row, keeping the lattice points
//! that fall inside the shape. Optional jitter is drawn from a seeded RNG so a
//! given region always produces the same particles.

use bevy::prelude::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MAX_PARTICLES;
use crate::error::SphError;
use crate::math::{Point, Real, Vector};

// Lattice steps per axis beyond which a region is rejected outright.
const MAX_LATTICE_STEPS: f64 = 1.0e15;

#[derive(Clone, Debug, PartialEq)]
pub enum SpawnShape {
    Rect { min: Point, max: Point },
    Disk { center: Point, radius: Real },
}

impl SpawnShape {
    pub fn square(center: Point, half_side: Real) -> Self {
        SpawnShape::Rect {
            min: center - Vec2::splat(half_side),
            max: center + Vec2::splat(half_side),
        }
    }

    fn bounds(&self) -> (Point, Point) {
        match self {
            SpawnShape::Rect { min, max } => (*min, *max),
            SpawnShape::Disk { center, radius } => {
                (*center - Vec2::splat(*radius), *center + Vec2::splat(*radius))
            }
        }
    }

    /// Horizontal extent of the shape on the row at height `y`.
    fn span_at(&self, y: Real) -> Option<(Real, Real)> {
        match self {
            SpawnShape::Rect { min, max } => (y >= min.y && y <= max.y).then_some((min.x, max.x)),
            SpawnShape::Disk { center, radius } => {
                let dy = y - center.y;
                let half_sq = radius * radius - dy * dy;
                (half_sq >= 0.0).then(|| {
                    let half = half_sq.sqrt();
                    (center.x - half, center.x + half)
                })
            }
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        match self {
            SpawnShape::Rect { min, max } => {
                point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
            }
            SpawnShape::Disk { center, radius } => {
                point.distance_squared(*center) <= radius * radius
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRegion {
    pub shape: SpawnShape,
    /// Lattice spacing between neighbouring particles.
    pub spacing: Real,
    /// Maximum random offset per axis, as a fraction of `spacing`.
    pub jitter: Real,
    pub seed: u64,
    pub initial_velocity: Vector,
}

impl SpawnRegion {
    pub fn new(shape: SpawnShape, spacing: Real) -> Self {
        Self {
            shape,
            spacing,
            jitter: 0.0,
            seed: 0,
            initial_velocity: Vec2::ZERO,
        }
    }

    pub fn with_jitter(mut self, jitter: Real, seed: u64) -> Self {
        self.jitter = jitter;
        self.seed = seed;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.initial_velocity = velocity;
        self
    }

    pub fn validate(&self) -> Result<(), SphError> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(SphError::invalid("spacing", self.spacing, "must be positive"));
        }
        if !(0.0..0.5).contains(&self.jitter) {
            return Err(SphError::invalid("jitter", self.jitter, "must lie in [0, 0.5)"));
        }
        let (min, max) = self.shape.bounds();
        if !min.is_finite() || !max.is_finite() {
            return Err(SphError::invalid("shape", Real::NAN, "bounds must be finite"));
        }
        lattice_count(max.x - min.x, self.spacing)?;
        lattice_count(max.y - min.y, self.spacing)?;
        Ok(())
    }

    /// Lattice points inside the shape, at most `limit` of them.
    ///
    /// Only the columns inside the shape are visited on each row, so the cost
    /// follows the number of points produced rather than the bounding box.
    pub fn positions(&self, limit: usize) -> Result<Vec<Point>, SphError> {
        self.validate()?;

        let (min, max) = self.shape.bounds();
        if max.x < min.x || max.y < min.y || limit == 0 {
            return Ok(Vec::new());
        }

        let columns = lattice_count(max.x - min.x, self.spacing)?;
        let rows = lattice_count(max.y - min.y, self.spacing)?;
        let mut rng = (self.jitter > 0.0).then(|| StdRng::seed_from_u64(self.seed));
        let amplitude = self.jitter * self.spacing;

        let mut out = Vec::with_capacity(limit.min(MAX_PARTICLES));
        'rows: for row in 0..rows {
            let y = min.y + row as Real * self.spacing;
            let Some((x_lo, x_hi)) = self.shape.span_at(y) else {
                continue;
            };
            let first = ((x_lo - min.x) / self.spacing).ceil().max(0.0) as usize;
            let last = (((x_hi - min.x) / self.spacing).floor().max(0.0) as usize).min(columns - 1);

            for column in first..=last {
                let lattice = Vec2::new(min.x + column as Real * self.spacing, y);
                if !self.shape.contains(lattice) {
                    continue;
                }
                let offset = match rng.as_mut() {
                    Some(rng) => Vec2::new(
                        rng.random_range(-amplitude..=amplitude),
                        rng.random_range(-amplitude..=amplitude),
                    ),
                    None => Vec2::ZERO,
                };
                out.push(lattice + offset);
                if out.len() == limit {
                    break 'rows;
                }
            }
        }

        Ok(out)
    }
}

/// Lattice points along an axis of length `extent`, ends included.
fn lattice_count(extent: Real, spacing: Real) -> Result<usize, SphError> {
    let steps = (f64::from(extent) / f64::from(spacing)).floor();
    if !steps.is_finite() || steps >= MAX_LATTICE_STEPS {
        return Err(SphError::invalid(
            "spacing",
            spacing,
            "too fine for the size of the spawn region",
        ));
    }
    Ok(steps.max(0.0) as usize + 1)
}
