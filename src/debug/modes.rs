use bevy::prelude::*;
use bevy_rapier3d::prelude::DebugRenderContext;

use crate::core::config::SceneConfig;
use crate::rendering::metaballs::resources::MetaballsToggle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugRenderMode {
    /// Glass isosurface (normal view).
    Surface,
    /// Surface hidden, Rapier collider wireframes on.
    RapierWireframe,
    /// Surface hidden; only the body markers remain.
    Markers,
}

impl DebugRenderMode {
    pub const ALL: [Self; 3] = [Self::Surface, Self::RapierWireframe, Self::Markers];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

#[derive(Resource, Debug)]
pub struct DebugState {
    pub mode: DebugRenderMode,
    pub last_mode: DebugRenderMode,
    pub log_interval: f32,
    pub time_accum: f32,
    pub frame_counter: u64,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            mode: DebugRenderMode::Surface,
            last_mode: DebugRenderMode::Surface,
            log_interval: 1.0,
            time_accum: 0.0,
            frame_counter: 0,
        }
    }
}

#[derive(Resource, Default, Debug, Clone)]
pub struct DebugStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub contributors: usize,
    pub triangles: usize,
    pub truncated: bool,
    pub truncation_episodes: u32,
}

pub fn apply_mode_system(
    state: Res<DebugState>,
    cfg: Res<SceneConfig>,
    mut toggle: ResMut<MetaballsToggle>,
    ctx: Option<ResMut<DebugRenderContext>>,
) {
    if !state.is_changed() && !cfg.is_changed() {
        return;
    }
    use DebugRenderMode::*;
    toggle.set_if_neq(MetaballsToggle(matches!(state.mode, Surface)));
    if let Some(mut c) = ctx {
        let enable = match state.mode {
            Surface => cfg.rapier_debug,
            RapierWireframe => true,
            Markers => false,
        };
        if c.enabled != enable {
            c.enabled = enable;
        }
    }
}
