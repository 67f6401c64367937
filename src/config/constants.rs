// Default physical constants for the 2D SPH solver

// Global physics
pub const GRAVITY: f32 = -10.0;

// Fluid material constants
pub const REST_DENSITY: f32 = 300.0;
pub const PARTICLE_MASS: f32 = 2.5;
pub const VISCOSITY: f32 = 200.0;

// Equation of state: p = k (rho - rho0)
pub const GAS_CONSTANT: f32 = 2000.0;

// Kernel support (h). Also the hash cell size and the boundary margin.
pub const KERNEL_RADIUS: f32 = 16.0;

// Integration
pub const INTEGRATION_TIMESTEP: f32 = 0.0007;
pub const BOUND_DAMPING: f32 = -0.5;

// Guards for the force and integration divisors
pub const MIN_PAIR_DISTANCE: f32 = 1.0e-5;
pub const MIN_DENSITY: f32 = 1.0e-6;

// Particle budget
pub const MAX_PARTICLES: usize = 16_000;
pub const DAM_PARTICLES: usize = 500;

// Domain: the viewport is twice the window in each axis
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;
pub const VIEWPORT_WIDTH: f32 = 2.0 * WINDOW_WIDTH as f32;
pub const VIEWPORT_HEIGHT: f32 = 2.0 * WINDOW_HEIGHT as f32;

pub const TARGET_FPS: u32 = 60;
