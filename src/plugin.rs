use std::time::Instant;

use bevy::prelude::*;

use crate::config::SphParams;
use crate::core::SphState;
use crate::math::Real;

/// Per-app scheduling knobs for the simulation systems.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimulationSettings {
    /// Fixed steps taken per `Update`.
    pub steps_per_frame: u32,
    /// Frames between diagnostic log lines. Zero disables them.
    pub diagnostics_interval: u64,
    pub paused: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            steps_per_frame: 1,
            diagnostics_interval: 120,
            paused: false,
        }
    }
}

/// Figures from the most recent frame, for overlays and logging.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct SimulationStats {
    pub frame: u64,
    pub particle_count: usize,
    pub average_density: Real,
    pub density_error: Real,
    pub max_speed: Real,
    pub step_ms: f64,
}

#[derive(Default)]
pub struct SphPlugin {
    pub params: SphParams,
    pub settings: SimulationSettings,
}

impl SphPlugin {
    pub fn new(params: SphParams) -> Self {
        Self {
            params,
            settings: SimulationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SimulationSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Plugin for SphPlugin {
    fn build(&self, app: &mut App) {
        let state = SphState::new(self.params.clone()).unwrap_or_else(|err| {
            error!("falling back to default fluid parameters: {err}");
            SphState::default()
        });

        app.insert_resource(state)
            .insert_resource(self.settings.clone())
            .init_resource::<SimulationStats>()
            .add_systems(
                Update,
                (apply_control_events, run_simulation, log_diagnostics).chain(),
            );
    }
}

/// Drain queued spawn, reset and parameter requests before the frame steps.
pub fn apply_control_events(mut state: ResMut<SphState>) {
    if state.pending_controls().is_empty() {
        return;
    }
    let applied = state.apply_pending_controls();
    debug!("applied {applied} control events, {} particles", state.particle_count());
}

pub fn run_simulation(
    mut state: ResMut<SphState>,
    settings: Res<SimulationSettings>,
    mut stats: ResMut<SimulationStats>,
) {
    if settings.paused {
        return;
    }

    let start = Instant::now();
    for _ in 0..settings.steps_per_frame {
        if let Err(err) = state.step_fixed() {
            warn!("simulation step skipped: {err}");
            break;
        }
    }

    stats.step_ms = start.elapsed().as_secs_f64() * 1000.0;
    let budget_ms = f64::from(state.params().frame_budget()) * 1000.0;
    if stats.step_ms > budget_ms {
        debug!("step took {:.3}ms, over the {budget_ms:.3}ms frame budget", stats.step_ms);
    }
    stats.frame = state.frame();
    stats.particle_count = state.particle_count();
    stats.average_density = state.average_density();
    stats.density_error = state.density_error();
    stats.max_speed = state.max_speed();
}

pub fn log_diagnostics(
    state: Res<SphState>,
    settings: Res<SimulationSettings>,
    stats: Res<SimulationStats>,
) {
    let interval = settings.diagnostics_interval;
    if interval == 0 || stats.frame == 0 || stats.frame % interval != 0 {
        return;
    }

    info!(
        "frame {}: {} particles, avg density {:.4}, max speed {:.2}, step {:.3}ms",
        stats.frame, stats.particle_count, stats.average_density, stats.max_speed, stats.step_ms
    );

    let broken = state.non_finite_count();
    if broken > 0 {
        warn!("{broken} particles have non-finite state");
    }
}
