//! Density and pressure pass
//!
//! Sums the poly6 kernel over the 3x3 cell neighbourhood, the particle itself
//! included, then applies the linear equation of state `p = k (rho - rho0)`.

use rayon::prelude::*;

use crate::config::SphParams;
use crate::core::kernel::KernelCoefficients;
use crate::core::particle_set::DensityView;
use crate::core::stage::{DensitiesValid, Hashed, StageToken};
use crate::core::SpatialHashGrid;
use crate::math::{Real, Vector};

/// Kernel-weighted mass around `positions[index]`.
#[inline]
pub fn particle_density(
    index: usize,
    positions: &[Vector],
    grid: &SpatialHashGrid,
    kernel: &KernelCoefficients,
    mass: Real,
) -> Real {
    let position = positions[index];
    let mut density = 0.0;
    grid.for_each_candidate(position, |j| {
        let r_sq = (positions[j] - position).length_squared();
        if r_sq < kernel.h_sq {
            density += mass * kernel.poly6(r_sq);
        }
    });
    density
}

/// Pressure from density. Negative below rest density, never clamped.
#[inline(always)]
pub fn pressure_from_density(density: Real, params: &SphParams) -> Real {
    params.gas_constant * (density - params.rest_density)
}

/// Writes density and pressure for every particle.
pub fn compute_density_pressure(
    token: StageToken<Hashed>,
    grid: &SpatialHashGrid,
    view: DensityView<'_>,
    params: &SphParams,
) -> StageToken<DensitiesValid> {
    let kernel = params.kernel();
    let mass = params.particle_mass;
    let DensityView {
        positions,
        densities,
        pressures,
    } = view;

    densities
        .par_iter_mut()
        .zip(pressures.par_iter_mut())
        .enumerate()
        .for_each(|(i, (density, pressure))| {
            *density = particle_density(i, positions, grid, &kernel, mass);
            *pressure = pressure_from_density(*density, params);
        });

    token.advance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParticleSet;
    use crate::core::Particle;
    use bevy::prelude::Vec2;

    fn run(positions: &[Vec2], params: &SphParams) -> ParticleSet {
        let mut set = ParticleSet::new(positions.len());
        set.insert_batch(positions.iter().map(|&p| Particle::new(p)));
        let mut grid = SpatialHashGrid::new(params.cell_size());
        let hashed = grid.rebuild(set.positions(), 0);
        let _ = compute_density_pressure(hashed, &grid, set.density_view(), params);
        set
    }

    #[test]
    fn isolated_particle_gets_self_term() {
        let params = SphParams::default();
        let set = run(&[Vec2::new(100.0, 100.0), Vec2::new(400.0, 400.0)], &params);
        let expected = params.self_density();
        for &density in set.densities() {
            assert!((density - expected).abs() <= expected * 1e-6);
        }
    }

    #[test]
    fn neighbours_add_density_symmetrically() {
        let params = SphParams::default();
        let set = run(&[Vec2::new(100.0, 100.0), Vec2::new(108.0, 100.0)], &params);
        let d = set.densities();
        assert!(d[0] > params.self_density());
        assert_eq!(d[0], d[1]);
    }

    #[test]
    fn particles_at_support_radius_do_not_interact() {
        let params = SphParams::default();
        let h = params.smoothing_radius;
        let set = run(&[Vec2::new(100.0, 100.0), Vec2::new(100.0 + h, 100.0)], &params);
        let expected = params.self_density();
        assert!((set.densities()[0] - expected).abs() <= expected * 1e-6);
    }

    #[test]
    fn pressure_sign_follows_density() {
        let params = SphParams::default();
        assert!(pressure_from_density(params.rest_density - 1.0, &params) < 0.0);
        assert!(pressure_from_density(params.rest_density + 1.0, &params) > 0.0);
        assert_eq!(pressure_from_density(params.rest_density, &params), 0.0);
    }
}
