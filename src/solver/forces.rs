//! Force pass
//!
//! Symmetric pressure term (averaged pressures over the neighbour density),
//! viscosity diffusion and gravity, accumulated per particle from the same
//! 3x3 cell neighbourhood as the density pass.

use rayon::prelude::*;

use crate::config::SphParams;
use crate::core::SpatialHashGrid;
use crate::core::particle_set::{ForceInputs, ForceView};
use crate::core::stage::{DensitiesValid, ForcesValid, StageToken};
use crate::math::{Vector, direction_or_none, zero_vector};

/// Net force on particle `a`.
///
/// Pairs closer than `min_pair_distance` have no defined direction and are
/// skipped. Densities used as divisors are clamped to `min_density`.
pub fn particle_force(
    a: usize,
    inputs: &ForceInputs<'_>,
    grid: &SpatialHashGrid,
    params: &SphParams,
) -> Vector {
    let kernel = params.kernel();
    let mass = params.particle_mass;
    let position = inputs.positions[a];
    let velocity = inputs.velocities[a];
    let pressure = inputs.pressures[a];

    let mut pressure_force = zero_vector();
    let mut viscosity_force = zero_vector();

    grid.for_each_candidate(position, |b| {
        if b == a {
            return;
        }
        let Some((direction, distance)) =
            direction_or_none(inputs.positions[b] - position, params.min_pair_distance)
        else {
            return;
        };
        if distance >= kernel.h {
            return;
        }

        let density_b = inputs.densities[b].max(params.min_density);
        pressure_force += -direction * mass * (pressure + inputs.pressures[b]) / (2.0 * density_b)
            * kernel.spiky_grad(distance);
        viscosity_force += params.viscosity * mass * (inputs.velocities[b] - velocity) / density_b
            * kernel.visc_lap(distance);
    });

    let density_a = inputs.densities[a].max(params.min_density);
    let gravity_force = Vector::new(0.0, params.gravity) * mass / density_a;

    pressure_force + viscosity_force + gravity_force
}

/// Writes the force accumulator of every particle. Reads only densities and
/// pressures finished by the previous stage.
pub fn compute_forces(
    token: StageToken<DensitiesValid>,
    grid: &SpatialHashGrid,
    view: ForceView<'_>,
    params: &SphParams,
) -> StageToken<ForcesValid> {
    let ForceView { inputs, forces } = view;

    forces
        .par_iter_mut()
        .enumerate()
        .for_each(|(a, force)| *force = particle_force(a, &inputs, grid, params));

    token.advance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Particle, ParticleSet};
    use crate::solver::density::compute_density_pressure;
    use bevy::prelude::Vec2;

    fn forces_for(particles: &[Particle], params: &SphParams) -> Vec<Vec2> {
        let mut set = ParticleSet::new(particles.len());
        set.insert_batch(particles.iter().copied());
        let mut grid = SpatialHashGrid::new(params.cell_size());
        let hashed = grid.rebuild(set.positions(), 0);
        let densities = compute_density_pressure(hashed, &grid, set.density_view(), params);
        let _ = compute_forces(densities, &grid, set.force_view(), params);
        set.forces().to_vec()
    }

    #[test]
    fn lone_particle_feels_only_gravity() {
        let params = SphParams::default();
        let forces = forces_for(&[Particle::new(Vec2::new(200.0, 200.0))], &params);
        let expected = params.gravity * params.particle_mass / params.self_density();
        assert_eq!(forces[0].x, 0.0);
        assert!((forces[0].y - expected).abs() <= expected.abs() * 1e-5);
    }

    #[test]
    fn pair_forces_are_equal_and_opposite_without_gravity() {
        let params = SphParams::zero_gravity();
        let forces = forces_for(
            &[
                Particle::new(Vec2::new(200.0, 200.0)),
                Particle::new(Vec2::new(206.0, 203.0)),
            ],
            &params,
        );
        assert!((forces[0] + forces[1]).length() <= forces[0].length() * 1e-5);
        assert!(forces[0].length() > 0.0);
    }

    #[test]
    fn below_rest_density_pair_is_pushed_apart() {
        // Default constants keep densities far below rho0, so pressures are
        // negative and the averaged-pressure term separates the pair.
        let params = SphParams::zero_gravity().with_viscosity(0.0);
        let forces = forces_for(
            &[
                Particle::new(Vec2::new(200.0, 200.0)),
                Particle::new(Vec2::new(208.0, 200.0)),
            ],
            &params,
        );
        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
    }

    #[test]
    fn viscosity_pulls_velocities_together() {
        let mut params = SphParams::zero_gravity().with_viscosity(200.0);
        params.gas_constant = 1.0e-12;
        let forces = forces_for(
            &[
                Particle::new(Vec2::new(200.0, 200.0)).with_velocity(Vec2::new(0.0, 10.0)),
                Particle::new(Vec2::new(208.0, 200.0)),
            ],
            &params,
        );
        assert!(forces[0].y < 0.0);
        assert!(forces[1].y > 0.0);
    }

    #[test]
    fn coincident_particles_skip_each_other() {
        let params = SphParams::zero_gravity();
        let forces = forces_for(
            &[
                Particle::new(Vec2::new(200.0, 200.0)),
                Particle::new(Vec2::new(200.0, 200.0)),
            ],
            &params,
        );
        assert!(forces.iter().all(|f| f.is_finite()));
        assert_eq!(forces[0], Vec2::ZERO);
    }
}
