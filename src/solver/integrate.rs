//! Explicit integration and boundary reflection
//!
//! Semi-implicit Euler with a fixed step, normally `SphParams::time_step`. The
//! step is not adapted to the particle velocities, so stability depends on the
//! tuning constants matching that step.

use rayon::prelude::*;

use crate::config::SphParams;
use crate::core::particle_set::IntegrateView;
use crate::core::stage::{ForcesValid, Integrated, StageToken};
use crate::math::{Real, Vector};

/// Axis-aligned rectangle `[0, extent]` shrunk by `margin` on every side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boundary {
    pub extent: Vector,
    pub margin: Real,
    /// Multiplier for the velocity component normal to a wall that was hit.
    pub damping: Real,
}

impl Boundary {
    pub fn from_params(params: &SphParams) -> Self {
        Self {
            extent: params.domain,
            margin: params.boundary_epsilon(),
            damping: params.boundary_damping,
        }
    }

    /// Clamp a particle that crossed the inset rectangle back onto it and
    /// damp the crossing velocity component. Returns whether a wall was hit.
    #[inline]
    pub fn reflect(&self, position: &mut Vector, velocity: &mut Vector) -> bool {
        let mut hit = false;

        if position.x - self.margin < 0.0 {
            velocity.x *= self.damping;
            position.x = self.margin;
            hit = true;
        }
        if position.x + self.margin > self.extent.x {
            velocity.x *= self.damping;
            position.x = self.extent.x - self.margin;
            hit = true;
        }
        if position.y - self.margin < 0.0 {
            velocity.y *= self.damping;
            position.y = self.margin;
            hit = true;
        }
        if position.y + self.margin > self.extent.y {
            velocity.y *= self.damping;
            position.y = self.extent.y - self.margin;
            hit = true;
        }

        hit
    }

    pub fn contains(&self, position: Vector) -> bool {
        position.x >= self.margin
            && position.x <= self.extent.x - self.margin
            && position.y >= self.margin
            && position.y <= self.extent.y - self.margin
    }
}

/// Advances velocities and positions of every particle by `dt`.
pub fn integrate(
    token: StageToken<ForcesValid>,
    view: IntegrateView<'_>,
    params: &SphParams,
    dt: Real,
) -> StageToken<Integrated> {
    let min_density = params.min_density;
    let boundary = Boundary::from_params(params);
    let IntegrateView {
        positions,
        velocities,
        forces,
        densities,
    } = view;

    positions
        .par_iter_mut()
        .zip(velocities.par_iter_mut())
        .enumerate()
        .for_each(|(i, (position, velocity))| {
            let density = densities[i].max(min_density);
            *velocity += dt * forces[i] / density;
            *position += dt * *velocity;
            boundary.reflect(position, velocity);
        });

    token.advance()
}
