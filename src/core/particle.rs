//! Fluid particles for SPH simulation
//!
//! A `Particle` is the value-type view of one slot of the `ParticleSet`.

use crate::math::{Real, Vector, zero_vector};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vector,
    pub velocity: Vector,
    /// Recomputed every frame by the force pass.
    pub force: Vector,
    /// Recomputed every frame by the density pass.
    pub density: Real,
    /// Derived from density. Negative below rest density.
    pub pressure: Real,
}

impl Default for Particle {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Particle {
    pub fn zeroed() -> Self {
        Self {
            position: zero_vector(),
            velocity: zero_vector(),
            force: zero_vector(),
            density: 0.0,
            pressure: 0.0,
        }
    }

    pub fn new(position: Vector) -> Self {
        Self {
            position,
            ..Self::zeroed()
        }
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline(always)]
    pub fn speed(&self) -> Real {
        self.velocity.length()
    }

    #[inline(always)]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.force.is_finite()
            && self.density.is_finite()
            && self.pressure.is_finite()
    }
}
