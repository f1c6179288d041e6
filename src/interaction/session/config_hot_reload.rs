use bevy::prelude::*;
use bevy::pbr::environment_map::EnvironmentMapLight;
use bevy_rapier3d::prelude::Damping;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::core::components::{Contributor, MetaBall, PointerBody, SceneCamera};
use crate::core::config::SceneConfig;
use crate::rendering::environment::environment::environment_intensity;
use crate::rendering::materials::glass::{apply_material_config, chromatic_aberration, GlassMaterial};
use crate::rendering::metaballs::resources::MetaballField;
use crate::rendering::palette::palette::color_or_white;

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}
impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/scene.ron"),
                PathBuf::from("assets/config/scene.local.ron"),
            ],
            interval_secs: 0.5,
        }
    }
}

impl ConfigReloadSettings {
    /// Watches exactly the layers the config was loaded from.
    pub fn for_layers(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            ..default()
        }
    }
}

#[derive(Resource, Debug)]
pub struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}
impl FromWorld for ConfigReloadState {
    fn from_world(world: &mut World) -> Self {
        let paths = world
            .get_resource::<ConfigReloadSettings>()
            .map(|s| s.paths.clone())
            .unwrap_or_default();
        Self::seeded(&paths)
    }
}

impl ConfigReloadState {
    /// Starts from the layers' current mtimes, so only later edits trigger a reload.
    pub fn seeded(paths: &[PathBuf]) -> Self {
        let last_mod = paths
            .iter()
            .filter_map(|p| modified(p).map(|t| (p.clone(), t)))
            .collect();
        Self {
            last_mod,
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }

    /// Records current mtimes; true when any layer is newer than last seen.
    pub fn any_modified(&mut self, paths: &[PathBuf]) -> bool {
        let mut dirty = false;
        for path in paths {
            let Some(mod_time) = modified(path) else {
                continue;
            };
            let entry = self
                .last_mod
                .entry(path.clone())
                .or_insert(SystemTime::UNIX_EPOCH);
            if mod_time > *entry {
                *entry = mod_time;
                dirty = true;
            }
        }
        dirty
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Layers that exist on disk; an absent optional layer (e.g. `scene.local.ron`)
/// is skipped instead of reported.
pub fn existing_layers(paths: &[PathBuf]) -> Vec<&PathBuf> {
    paths.iter().filter(|p| p.exists()).collect()
}

/// Polls the config layers, swaps in the new `SceneConfig` and pushes the
/// changed values into the live scene. Per-ball colours and start positions
/// only take effect on the next launch.
pub struct ConfigHotReloadPlugin;
impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Update, poll_and_reload_config)
                .add_systems(
                    Update,
                    (apply_scene_look, apply_material, apply_field_params, apply_body_params)
                        .after(poll_and_reload_config)
                        .run_if(resource_changed::<SceneConfig>),
                );
        }
    }
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<SceneConfig>,
    mut windows: Query<&mut Window>,
) {
    let interval = settings.interval_secs.max(0.05);
    if (state.timer.duration().as_secs_f32() - interval).abs() > f32::EPSILON {
        state
            .timer
            .set_duration(std::time::Duration::from_secs_f32(interval));
    }
    if !state.timer.tick(time.delta()).finished() {
        return;
    }
    if !state.any_modified(&settings.paths) {
        return;
    }
    let (new_cfg, _used, errors) = SceneConfig::load_layered(existing_layers(&settings.paths));
    for e in errors {
        warn!(target: "config", "CONFIG HOT-RELOAD issue: {e}");
    }
    if *cfg_res == new_cfg {
        return;
    }
    for w in new_cfg.validate() {
        warn!(target: "config", "CONFIG warning: {w}");
    }
    info!(target: "config", "Config hot-reload applied");
    if let Ok(mut window) = windows.single_mut() {
        if window.width() != new_cfg.window.width || window.height() != new_cfg.window.height {
            window
                .resolution
                .set(new_cfg.window.width, new_cfg.window.height);
        }
        if window.title != new_cfg.window.title {
            window.title = new_cfg.window.title.clone();
        }
    }
    *cfg_res = new_cfg;
}

fn apply_scene_look(
    mut commands: Commands,
    cfg: Res<SceneConfig>,
    q_cam: Query<(Entity, Option<&EnvironmentMapLight>), With<SceneCamera>>,
) {
    commands.insert_resource(ClearColor(color_or_white(&cfg.camera.background)));
    commands.insert_resource(AmbientLight {
        color: color_or_white(&cfg.lighting.ambient_color),
        brightness: cfg.lighting.ambient_brightness,
        ..default()
    });
    for (cam, env) in &q_cam {
        let mut e = commands.entity(cam);
        e.insert(chromatic_aberration(&cfg.material));
        if let Some(env) = env {
            e.insert(EnvironmentMapLight {
                intensity: environment_intensity(&cfg),
                ..env.clone()
            });
        }
    }
}

fn apply_material(
    cfg: Res<SceneConfig>,
    q: Query<&MeshMaterial3d<GlassMaterial>>,
    materials: Option<ResMut<Assets<GlassMaterial>>>,
) {
    let Some(mut materials) = materials else {
        return;
    };
    for handle in &q {
        if let Some(mat) = materials.get_mut(&handle.0) {
            apply_material_config(mat, &cfg.material);
        }
    }
}

pub fn apply_field_params(cfg: Res<SceneConfig>, field: Option<ResMut<MetaballField>>) {
    let Some(mut field) = field else {
        return;
    };
    let f = &cfg.field;
    if field.resolution() != f.resolution {
        info!(target: "metaballs", "field resolution {} -> {}", field.resolution(), f.resolution);
        *field = MetaballField::from_config(&cfg);
        return;
    }
    field.set_max_poly_count(f.max_poly_count);
    field.set_isolation(f.isolation);
    field.set_colors(f.enable_colors);
}

pub fn apply_body_params(
    cfg: Res<SceneConfig>,
    mut q_balls: Query<(&mut Contributor, &mut Damping), (With<MetaBall>, Without<PointerBody>)>,
    mut q_pointer: Query<&mut Contributor, (With<PointerBody>, Without<MetaBall>)>,
) {
    let m = &cfg.metaball;
    for (mut c, mut damping) in &mut q_balls {
        c.strength = m.strength;
        c.subtract = m.subtract;
        damping.linear_damping = m.linear_damping;
        damping.angular_damping = m.angular_damping;
    }
    let p = &cfg.pointer;
    for mut c in &mut q_pointer {
        *c = Contributor::new(p.strength, p.subtract, color_or_white(&p.color));
    }
}
