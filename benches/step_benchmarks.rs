/// Simple custom benchmarking without criterion
use std::time::Instant;

use bevy::prelude::*;
use sph2d::prelude::*;
use sph2d::SpatialHashGrid;

fn time_it<F: FnMut()>(name: &str, iterations: usize, mut f: F) {
    // Warmup
    for _ in 0..5 {
        f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let elapsed = start.elapsed();

    let avg_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    println!("{}: {:.3}ms avg ({} iterations)", name, avg_ms, iterations);
}

/// Square block of `count` particles at half the kernel radius.
fn create_test_state(count: usize) -> SphState {
    let params = SphParams::zero_gravity().with_max_particles(count);
    let mut state = match SphState::new(params) {
        Ok(state) => state,
        Err(err) => panic!("benchmark params rejected: {err}"),
    };

    let spacing = 0.5 * KERNEL_RADIUS;
    let half_side = 0.5 * spacing * (count as f32).sqrt();
    let center = Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT) * 0.5;
    let region = SpawnRegion::new(SpawnShape::square(center, half_side + spacing), spacing)
        .with_velocity(Vec2::new(1.0, -2.0));
    if let Err(err) = state.spawn_region(&region, count) {
        panic!("benchmark spawn failed: {err}");
    }
    state
}

fn main() {
    println!("\n=== SPH2D Benchmarks ===\n");

    println!("--- Grid Rebuild ---");
    for &count in &[1000, 5000, 10000] {
        let state = create_test_state(count);
        let positions = state.positions().to_vec();
        let mut grid = SpatialHashGrid::new(KERNEL_RADIUS);

        time_it(&format!("rebuild (n={})", positions.len()), 50, || {
            let _ = grid.rebuild(&positions, 0);
        });
    }

    println!("\n--- Density Pass ---");
    for &count in &[1000, 5000, 10000] {
        let mut state = create_test_state(count);

        time_it(&format!("refresh_densities (n={})", state.particle_count()), 20, || {
            state.refresh_densities();
        });
    }

    println!("\n--- Full Step ---");
    for &count in &[1000, 5000, 10000, 16000] {
        let mut state = create_test_state(count);

        time_it(&format!("step (n={})", state.particle_count()), 10, || {
            if let Err(err) = state.step_fixed() {
                panic!("step failed: {err}");
            }
        });
    }

    println!("\n=== Benchmark Complete ===\n");
}
