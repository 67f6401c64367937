use bevy::prelude::*;

use crate::config::{DAM_PARTICLES, SphParams};
use crate::error::SphError;
use crate::math::{Real, Vector};
use crate::solver::{compute_density_pressure, compute_forces, integrate};

use super::grid::SpatialHashGrid;
use super::particle::Particle;
use super::particle_set::ParticleSet;
use super::spawn::{SpawnRegion, SpawnShape};

/// Requests queued by the host and applied between frames.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    /// Fill a region, adding at most `max_count` particles.
    Spawn {
        region: SpawnRegion,
        max_count: usize,
    },
    /// Drop a square block of fluid from above the centre of the domain.
    Drop,
    Clear,
    /// Clear and rebuild the dam-break column.
    Reset,
    SetParams(SphParams),
}

/// Owned copy of the columns a renderer needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSnapshot {
    pub positions: Vec<Vector>,
    pub pressures: Vec<Real>,
}

/// Aggregate simulation state for the solver.
#[derive(Resource, Clone)]
pub struct SphState {
    particle_set: ParticleSet,
    grid: SpatialHashGrid,
    params: SphParams,
    pending: Vec<ControlEvent>,
    frame: u64,
}

impl Default for SphState {
    fn default() -> Self {
        Self::from_valid_params(SphParams::default())
    }
}

impl SphState {
    pub fn new(params: SphParams) -> Result<Self, SphError> {
        params.validate()?;
        Ok(Self::from_valid_params(params))
    }

    fn from_valid_params(params: SphParams) -> Self {
        Self {
            particle_set: ParticleSet::new(params.max_particles),
            grid: SpatialHashGrid::new(params.cell_size()),
            params,
            pending: Vec::new(),
            frame: 0,
        }
    }

    pub fn particle_set(&self) -> &ParticleSet {
        &self.particle_set
    }

    pub fn particle_count(&self) -> usize {
        self.particle_set.len()
    }

    pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
        self.particle_set.iter()
    }

    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    pub fn params(&self) -> &SphParams {
        &self.params
    }

    /// Replace the tunables. Invalid settings are rejected and the current
    /// ones kept.
    pub fn set_params(&mut self, params: SphParams) -> Result<(), SphError> {
        params.validate()?;
        self.particle_set.set_capacity(params.max_particles);
        self.grid.set_cell_size(params.cell_size());
        self.params = params;
        Ok(())
    }

    /// Number of completed steps since construction.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn positions(&self) -> &[Vector] {
        self.particle_set.positions()
    }

    pub fn pressures(&self) -> &[Real] {
        self.particle_set.pressures()
    }

    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            positions: self.positions().to_vec(),
            pressures: self.pressures().to_vec(),
        }
    }

    /// One step of the configured `time_step`.
    pub fn step_fixed(&mut self) -> Result<(), SphError> {
        self.step(self.params.time_step)
    }

    /// Hash, density, forces and integration, in that order, each stage
    /// consuming the previous one's token.
    pub fn step(&mut self, dt: Real) -> Result<(), SphError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SphError::InvalidParameter {
                name: "dt",
                value: dt,
                reason: "must be positive",
            });
        }

        let hashed = self.grid.rebuild(self.particle_set.positions(), self.frame);
        let densities =
            compute_density_pressure(hashed, &self.grid, self.particle_set.density_view(), &self.params);
        let forces = compute_forces(densities, &self.grid, self.particle_set.force_view(), &self.params);
        let integrated = integrate(forces, self.particle_set.integrate_view(), &self.params, dt);
        debug_assert_eq!(integrated.frame(), self.frame);

        self.frame += 1;
        Ok(())
    }

    /// Rebuild the grid and recompute densities and pressures without moving
    /// anything. Returns the new average density.
    pub fn refresh_densities(&mut self) -> Real {
        let hashed = self.grid.rebuild(self.particle_set.positions(), self.frame);
        let _ = compute_density_pressure(hashed, &self.grid, self.particle_set.density_view(), &self.params);
        self.average_density()
    }

    /// Add the lattice points of `region`, at most `max_count` and never past
    /// the particle cap. Returns how many were added.
    pub fn spawn_region(&mut self, region: &SpawnRegion, max_count: usize) -> Result<usize, SphError> {
        let limit = max_count.min(self.particle_set.remaining_capacity());
        let velocity = region.initial_velocity;
        let positions = region.positions(limit)?;
        if limit < max_count && positions.len() == limit {
            debug!("spawn truncated at the particle cap of {}", self.particle_set.capacity());
        }
        let added = self
            .particle_set
            .insert_batch(positions.into_iter().map(|p| Particle::new(p).with_velocity(velocity)));

        debug!(
            "spawned {added} particles ({} total, cap {})",
            self.particle_set.len(),
            self.particle_set.capacity()
        );
        Ok(added)
    }

    /// Column of fluid filling the left half of the lower domain.
    pub fn spawn_dam(&mut self) -> Result<usize, SphError> {
        let eps = self.params.boundary_epsilon();
        let domain = self.params.domain;
        let region = SpawnRegion::new(
            SpawnShape::Rect {
                min: Vec2::new(domain.x / 4.0, eps),
                max: Vec2::new(domain.x / 2.0, domain.y - 2.0 * eps),
            },
            self.params.smoothing_radius,
        );
        self.spawn_region(&region, DAM_PARTICLES)
    }

    /// Square block centred above the middle of the domain.
    pub fn spawn_drop(&mut self) -> Result<usize, SphError> {
        let domain = self.params.domain;
        let region = SpawnRegion::new(
            SpawnShape::square(Vec2::new(domain.x / 2.0, domain.y / 1.5), domain.y / 5.0),
            0.95 * self.params.smoothing_radius,
        );
        self.spawn_region(&region, usize::MAX)
    }

    pub fn clear(&mut self) {
        self.particle_set.clear();
    }

    pub fn reset(&mut self) -> Result<usize, SphError> {
        self.clear();
        self.spawn_dam()
    }

    pub fn queue(&mut self, event: ControlEvent) {
        self.pending.push(event);
    }

    pub fn pending_controls(&self) -> &[ControlEvent] {
        &self.pending
    }

    /// Apply queued events in arrival order. A rejected event is logged and
    /// skipped. Returns how many were applied.
    pub fn apply_pending_controls(&mut self) -> usize {
        let mut applied = 0;
        for event in std::mem::take(&mut self.pending) {
            let result = match event {
                ControlEvent::Spawn { region, max_count } => {
                    self.spawn_region(&region, max_count).map(drop)
                }
                ControlEvent::Drop => self.spawn_drop().map(drop),
                ControlEvent::Clear => {
                    self.clear();
                    Ok(())
                }
                ControlEvent::Reset => self.reset().map(drop),
                ControlEvent::SetParams(params) => self.set_params(params),
            };
            match result {
                Ok(()) => applied += 1,
                Err(err) => warn!("control event rejected: {err}"),
            }
        }
        applied
    }

    pub fn average_density(&self) -> Real {
        let densities = self.particle_set.densities();
        if densities.is_empty() {
            return 0.0;
        }
        densities.iter().sum::<Real>() / densities.len() as Real
    }

    /// Mean of `|rho - rho0| / rho0`.
    pub fn density_error(&self) -> Real {
        let densities = self.particle_set.densities();
        if densities.is_empty() {
            return 0.0;
        }
        let rest = self.params.rest_density.max(self.params.min_density);
        densities.iter().map(|d| (d - rest).abs() / rest).sum::<Real>() / densities.len() as Real
    }

    pub fn max_speed(&self) -> Real {
        self.particle_set
            .velocities()
            .iter()
            .map(|v| v.length())
            .fold(0.0, Real::max)
    }

    pub fn non_finite_count(&self) -> usize {
        self.particles().filter(|p| !p.is_finite()).count()
    }
}
