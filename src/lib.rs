//! Real-time 2D smoothed particle hydrodynamics.
//!
//! Each step rebuilds a spatial hash over the particles, evaluates density and
//! pressure, accumulates pressure, viscosity and gravity forces, then
//! integrates with a fixed time step and reflects particles off the domain
//! walls. `SphPlugin` drives the same pipeline from a bevy `Update` schedule.

pub mod config;
pub mod core;
pub mod error;
pub mod math;
pub mod plugin;
pub mod solver;

pub use crate::config::{SphParams, constants};
pub use crate::core::{
    ControlEvent, Particle, ParticleSet, ParticleSnapshot, SpatialHashGrid, SpawnRegion,
    SpawnShape, SphState,
};
pub use crate::error::SphError;
pub use crate::plugin::{SimulationSettings, SimulationStats, SphPlugin};

pub mod prelude {
    pub use crate::config::{SphParams, constants::*};
    pub use crate::core::{ControlEvent, Particle, SpawnRegion, SpawnShape, SphState};
    pub use crate::error::SphError;
    pub use crate::math::{Real, Vector};
    pub use crate::plugin::{SimulationSettings, SimulationStats, SphPlugin};
}
