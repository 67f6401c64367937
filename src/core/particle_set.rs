use crate::config::MAX_PARTICLES;
use crate::core::Particle;
use crate::math::{Real, Vector};

/// Mutable views handed to the density pass.
pub struct DensityView<'a> {
    pub positions: &'a [Vector],
    pub densities: &'a mut [Real],
    pub pressures: &'a mut [Real],
}

/// Columns the force pass reads. Finalised by the density pass.
#[derive(Clone, Copy)]
pub struct ForceInputs<'a> {
    pub positions: &'a [Vector],
    pub velocities: &'a [Vector],
    pub densities: &'a [Real],
    pub pressures: &'a [Real],
}

/// Mutable views handed to the force pass.
pub struct ForceView<'a> {
    pub inputs: ForceInputs<'a>,
    pub forces: &'a mut [Vector],
}

/// Mutable views handed to the integrator.
pub struct IntegrateView<'a> {
    pub positions: &'a mut [Vector],
    pub velocities: &'a mut [Vector],
    pub forces: &'a [Vector],
    pub densities: &'a [Real],
}

/// Particle store laid out as a structure of arrays.
///
/// Each stage borrows exactly the columns it writes mutably and the rest
/// immutably, so parallel tasks indexed by particle never alias.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    positions: Vec<Vector>,
    velocities: Vec<Vector>,
    forces: Vec<Vector>,
    densities: Vec<Real>,
    pressures: Vec<Real>,
    capacity: usize,
}

impl ParticleSet {
    /// `capacity` is only a cap on inserts. Storage is reserved up to the
    /// default particle budget and grows past it on demand.
    pub fn new(capacity: usize) -> Self {
        let reserve = capacity.min(MAX_PARTICLES);
        Self {
            positions: Vec::with_capacity(reserve),
            velocities: Vec::with_capacity(reserve),
            forces: Vec::with_capacity(reserve),
            densities: Vec::with_capacity(reserve),
            pressures: Vec::with_capacity(reserve),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Upper bound on the particle count enforced by inserts.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the cap. Lowering it below the current count keeps the existing
    /// particles and only blocks further inserts.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining_capacity() == 0
    }

    /// Append a particle, returning its index, or `None` once at capacity.
    pub fn insert(&mut self, particle: Particle) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = self.len();
        self.positions.push(particle.position);
        self.velocities.push(particle.velocity);
        self.forces.push(particle.force);
        self.densities.push(particle.density);
        self.pressures.push(particle.pressure);
        Some(index)
    }

    /// Append particles until the batch or the capacity runs out. Returns how
    /// many were added.
    pub fn insert_batch<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = Particle>,
    {
        let before = self.len();
        for particle in batch.into_iter().take(self.remaining_capacity()) {
            let _ = self.insert(particle);
        }
        self.len() - before
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.velocities.clear();
        self.forces.clear();
        self.densities.clear();
        self.pressures.clear();
    }

    pub fn get(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            velocity: self.velocities[index],
            force: self.forces[index],
            density: self.densities[index],
            pressure: self.pressures[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }

    pub fn positions(&self) -> &[Vector] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vector] {
        &self.velocities
    }

    pub fn forces(&self) -> &[Vector] {
        &self.forces
    }

    pub fn densities(&self) -> &[Real] {
        &self.densities
    }

    pub fn pressures(&self) -> &[Real] {
        &self.pressures
    }

    pub fn density_view(&mut self) -> DensityView<'_> {
        DensityView {
            positions: &self.positions,
            densities: &mut self.densities,
            pressures: &mut self.pressures,
        }
    }

    pub fn force_view(&mut self) -> ForceView<'_> {
        ForceView {
            inputs: ForceInputs {
                positions: &self.positions,
                velocities: &self.velocities,
                densities: &self.densities,
                pressures: &self.pressures,
            },
            forces: &mut self.forces,
        }
    }

    pub fn integrate_view(&mut self) -> IntegrateView<'_> {
        IntegrateView {
            positions: &mut self.positions,
            velocities: &mut self.velocities,
            forces: &self.forces,
            densities: &self.densities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec2;

    #[test]
    fn insert_stops_at_capacity() {
        let mut set = ParticleSet::new(2);
        assert_eq!(set.insert(Particle::new(Vec2::ZERO)), Some(0));
        assert_eq!(set.insert(Particle::new(Vec2::ONE)), Some(1));
        assert_eq!(set.insert(Particle::new(Vec2::ONE)), None);
        assert_eq!(set.len(), 2);
        assert!(set.is_full());
    }

    #[test]
    fn batch_insert_is_truncated() {
        let mut set = ParticleSet::new(5);
        let added = set.insert_batch((0..8).map(|i| Particle::new(Vec2::splat(i as f32))));
        assert_eq!(added, 5);
        assert_eq!(set.len(), 5);
        assert_eq!(set.positions()[4], Vec2::splat(4.0));
        assert_eq!(set.insert_batch([Particle::zeroed()]), 0);
    }

    #[test]
    fn lowering_capacity_keeps_particles() {
        let mut set = ParticleSet::new(4);
        set.insert_batch((0..4).map(|i| Particle::new(Vec2::splat(i as f32))));
        set.set_capacity(2);
        assert_eq!(set.len(), 4);
        assert_eq!(set.remaining_capacity(), 0);
    }

    #[test]
    fn unbounded_cap_does_not_reserve_it() {
        let mut set = ParticleSet::new(usize::MAX);
        assert_eq!(set.capacity(), usize::MAX);
        assert!(set.positions.capacity() <= MAX_PARTICLES);
        assert_eq!(set.insert(Particle::new(Vec2::ONE)), Some(0));
        assert_eq!(set.remaining_capacity(), usize::MAX - 1);
    }

    #[test]
    fn columns_stay_length_matched() {
        let mut set = ParticleSet::new(10);
        set.insert_batch((0..3).map(|i| {
            Particle::new(Vec2::new(i as f32, 0.0)).with_velocity(Vec2::Y)
        }));
        assert_eq!(set.positions().len(), 3);
        assert_eq!(set.pressures().len(), 3);
        assert_eq!(set.get(2).map(|p| p.velocity), Some(Vec2::Y));
        assert!(set.get(3).is_none());

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.densities().len(), 0);
        assert_eq!(set.capacity(), 10);
    }
}
