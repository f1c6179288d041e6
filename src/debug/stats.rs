use bevy::prelude::*;

use super::modes::{DebugState, DebugStats};
use crate::rendering::metaballs::resources::FieldStats;

pub fn debug_stats_collect_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    field: Option<Res<FieldStats>>,
) {
    state.bypass_change_detection().frame_counter += 1;
    let dt = time.delta_secs().max(1e-6);
    let inst_fps = 1.0 / dt;
    if stats.fps == 0.0 {
        stats.fps = inst_fps;
    } else {
        stats.fps = stats.fps * 0.9 + inst_fps * 0.1;
    }
    let inst_ms = dt * 1000.0;
    if stats.frame_time_ms == 0.0 {
        stats.frame_time_ms = inst_ms;
    } else {
        stats.frame_time_ms = stats.frame_time_ms * 0.9 + inst_ms * 0.1;
    }
    if let Some(f) = field {
        stats.contributors = f.contributors;
        stats.triangles = f.triangles;
        stats.truncated = f.truncated;
        stats.truncation_episodes = f.truncation_episodes;
    }
}
