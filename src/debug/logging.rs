use bevy::prelude::*;

use super::modes::{DebugState, DebugStats};

pub fn debug_logging_system(time: Res<Time>, mut state: ResMut<DebugState>, stats: Res<DebugStats>) {
    let state = state.bypass_change_detection();
    state.time_accum += time.delta_secs();
    if state.time_accum >= state.log_interval {
        state.time_accum = 0.0;
        info!(
            target: "debug",
            "SIM frame={} t={:.3}s fps={:.1} ft_ms={:.1} contributors={} tris={} trunc={} episodes={} mode={:?}",
            state.frame_counter,
            time.elapsed_secs(),
            stats.fps,
            stats.frame_time_ms,
            stats.contributors,
            stats.triangles,
            stats.truncated,
            stats.truncation_episodes,
            state.mode
        );
    }
}
