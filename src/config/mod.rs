//! Configuration and parameters
//!
//! Default constants and the runtime-tunable solver settings.

pub mod constants;
pub mod solver_params;

pub use constants::*;
pub use solver_params::*;
