// src/solver/mod.rs
pub mod density;
pub mod forces;
pub mod integrate;

// Re-export from the solver module
pub use density::*;
pub use forces::*;
pub use integrate::*;
