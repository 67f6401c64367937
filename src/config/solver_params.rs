use bevy::prelude::*;

use crate::core::kernel::KernelCoefficients;
use crate::error::SphError;
use crate::math::{Real, Vector};

use super::constants::*;

/// Tunables for the SPH pipeline.
///
/// Everything here may be changed between frames; the next `step` picks the
/// new values up; kernel coefficients are derived on demand rather than cached.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SphParams {
    /// Vertical gravitational acceleration (negative points down).
    pub gravity: Real,
    /// Target density rho0 of the equation of state.
    pub rest_density: Real,
    /// Stiffness k in `p = k (rho - rho0)`.
    pub gas_constant: Real,
    /// Kernel support h.
    pub smoothing_radius: Real,
    pub particle_mass: Real,
    /// Viscosity coefficient mu.
    pub viscosity: Real,
    /// Fixed explicit time step. Independent of the render frame time.
    pub time_step: Real,
    /// Velocity multiplier applied on boundary contact, in `[-1, 0]`.
    pub boundary_damping: Real,
    /// Simulation rectangle `[0, W] x [0, H]`.
    pub domain: Vector,
    pub max_particles: usize,
    pub target_fps: u32,
    /// Neighbour pairs closer than this are skipped by the force pass.
    pub min_pair_distance: Real,
    /// Densities are clamped to at least this before being divided by.
    pub min_density: Real,
}

impl Default for SphParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            rest_density: REST_DENSITY,
            gas_constant: GAS_CONSTANT,
            smoothing_radius: KERNEL_RADIUS,
            particle_mass: PARTICLE_MASS,
            viscosity: VISCOSITY,
            time_step: INTEGRATION_TIMESTEP,
            boundary_damping: BOUND_DAMPING,
            domain: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            max_particles: MAX_PARTICLES,
            target_fps: TARGET_FPS,
            min_pair_distance: MIN_PAIR_DISTANCE,
            min_density: MIN_DENSITY,
        }
    }
}

impl SphParams {
    /// The dam-break setup of the interactive demo.
    pub fn dam_break() -> Self {
        Self::default()
    }

    /// Default fluid with gravity switched off.
    pub fn zero_gravity() -> Self {
        Self {
            gravity: 0.0,
            ..Self::default()
        }
    }

    pub fn with_gravity(mut self, gravity: Real) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_viscosity(mut self, viscosity: Real) -> Self {
        self.viscosity = viscosity;
        self
    }

    pub fn with_domain(mut self, width: Real, height: Real) -> Self {
        self.domain = Vec2::new(width, height);
        self
    }

    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }

    pub fn with_time_step(mut self, time_step: Real) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_target_fps(mut self, target_fps: u32) -> Self {
        self.target_fps = target_fps.max(1);
        self
    }

    /// Hash grid cell edge. Equal to h so a 3x3 block covers the kernel support.
    #[inline]
    pub fn cell_size(&self) -> Real {
        self.smoothing_radius
    }

    /// Distance kept between particles and the domain edges.
    #[inline]
    pub fn boundary_epsilon(&self) -> Real {
        self.smoothing_radius
    }

    #[inline]
    pub fn kernel(&self) -> KernelCoefficients {
        KernelCoefficients::new(self.smoothing_radius)
    }

    /// Frame budget implied by `target_fps`, in seconds.
    pub fn frame_budget(&self) -> Real {
        1.0 / self.target_fps.max(1) as Real
    }

    /// Density of an isolated particle: the kernel self term.
    pub fn self_density(&self) -> Real {
        let kernel = self.kernel();
        self.particle_mass * kernel.poly6 * kernel.h_sq.powi(3)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), SphError> {
        fn positive(name: &'static str, value: Real) -> Result<(), SphError> {
            if !value.is_finite() {
                return Err(SphError::invalid(name, value, "must be finite"));
            }
            if value <= 0.0 {
                return Err(SphError::invalid(name, value, "must be positive"));
            }
            Ok(())
        }

        positive("smoothing_radius", self.smoothing_radius)?;
        positive("particle_mass", self.particle_mass)?;
        positive("time_step", self.time_step)?;
        positive("gas_constant", self.gas_constant)?;
        positive("min_density", self.min_density)?;

        for (name, value) in [
            ("gravity", self.gravity),
            ("rest_density", self.rest_density),
            ("viscosity", self.viscosity),
            ("min_pair_distance", self.min_pair_distance),
        ] {
            if !value.is_finite() {
                return Err(SphError::invalid(name, value, "must be finite"));
            }
        }

        if self.rest_density < 0.0 {
            return Err(SphError::invalid(
                "rest_density",
                self.rest_density,
                "must not be negative",
            ));
        }
        if self.viscosity < 0.0 {
            return Err(SphError::invalid(
                "viscosity",
                self.viscosity,
                "must not be negative",
            ));
        }
        if !(-1.0..=0.0).contains(&self.boundary_damping) {
            return Err(SphError::invalid(
                "boundary_damping",
                self.boundary_damping,
                "must lie in [-1, 0]",
            ));
        }

        let margin = self.boundary_epsilon();
        if !self.domain.is_finite()
            || self.domain.x <= 2.0 * margin
            || self.domain.y <= 2.0 * margin
        {
            return Err(SphError::DegenerateDomain {
                width: self.domain.x,
                height: self.domain.y,
                margin,
            });
        }

        Ok(())
    }
}
