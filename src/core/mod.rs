pub mod grid;
pub mod kernel;
pub mod particle;
pub mod particle_set;
pub mod spawn;
pub mod sph_state;
pub mod stage;

pub use grid::SpatialHashGrid;
pub use kernel::{
    CellHash, KernelCoefficients, NEIGHBOR_COUNT, NEIGHBOR_OFFSETS, cell_from_position, hash_cell,
    neighbor_cells,
};
pub use particle::Particle;
pub use particle_set::{DensityView, ForceInputs, ForceView, IntegrateView, ParticleSet};
pub use spawn::{SpawnRegion, SpawnShape};
pub use sph_state::{ControlEvent, ParticleSnapshot, SphState};
pub use stage::{DensitiesValid, ForcesValid, Hashed, Integrated, StageToken};
