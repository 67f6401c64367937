use bevy::log::LogPlugin;
use bevy::prelude::*;
use sph2d::prelude::*;

const DEFAULT_FRAMES: u64 = 600;

fn main() {
    let frames = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        LogPlugin::default(),
        SphPlugin::new(SphParams::dam_break()),
    ));
    app.world_mut()
        .resource_mut::<SphState>()
        .queue(ControlEvent::Reset);

    for frame in 0..frames {
        // Drop a second block once the dam has started to collapse.
        if frame == frames / 2 {
            app.world_mut()
                .resource_mut::<SphState>()
                .queue(ControlEvent::Drop);
        }
        app.update();
    }

    let stats = app.world().resource::<SimulationStats>();
    info!(
        "finished after {} frames: {} particles, avg density {:.4}, density error {:.3}, max speed {:.2}",
        stats.frame, stats.particle_count, stats.average_density, stats.density_error, stats.max_speed
    );
}
