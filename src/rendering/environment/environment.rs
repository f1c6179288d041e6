//! Image-based lighting from prefiltered KTX2 cube maps.
use bevy::asset::LoadState;
use bevy::pbr::environment_map::EnvironmentMapLight;
use bevy::prelude::*;

use crate::core::components::SceneCamera;
use crate::core::config::SceneConfig;

#[derive(Resource, Debug, Clone)]
pub struct EnvironmentMaps {
    pub diffuse: Handle<Image>,
    pub specular: Handle<Image>,
    pub intensity: f32,
    failed: bool,
}

/// Final light intensity: base scene intensity scaled by the material's
/// environment contribution.
pub fn environment_intensity(cfg: &SceneConfig) -> f32 {
    cfg.environment.intensity * cfg.material.env_map_intensity.max(0.0)
}

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_environment_maps).add_systems(
            Update,
            (attach_environment_map, watch_environment_failure)
                .run_if(resource_exists::<EnvironmentMaps>),
        );
    }
}

fn load_environment_maps(mut commands: Commands, cfg: Res<SceneConfig>, assets: Res<AssetServer>) {
    if !cfg.environment.enabled {
        info!(target: "scene", "environment map disabled; ambient light only");
        return;
    }
    info!(
        target: "scene",
        "loading environment maps (source: {})",
        cfg.environment.source_url
    );
    commands.insert_resource(EnvironmentMaps {
        diffuse: assets.load(cfg.environment.diffuse_map.clone()),
        specular: assets.load(cfg.environment.specular_map.clone()),
        intensity: environment_intensity(&cfg),
        failed: false,
    });
}

fn attach_environment_map(
    mut commands: Commands,
    maps: Res<EnvironmentMaps>,
    q_cam: Query<Entity, (With<SceneCamera>, Without<EnvironmentMapLight>)>,
) {
    if maps.failed {
        return;
    }
    for cam in &q_cam {
        commands.entity(cam).insert(EnvironmentMapLight {
            diffuse_map: maps.diffuse.clone(),
            specular_map: maps.specular.clone(),
            intensity: maps.intensity,
            ..default()
        });
    }
}

fn watch_environment_failure(
    mut commands: Commands,
    mut maps: ResMut<EnvironmentMaps>,
    assets: Res<AssetServer>,
    q_cam: Query<Entity, With<SceneCamera>>,
) {
    if maps.failed {
        return;
    }
    let failure = [&maps.diffuse, &maps.specular]
        .into_iter()
        .find_map(|handle| match assets.get_load_state(handle) {
            Some(LoadState::Failed(err)) => Some(err),
            _ => None,
        });
    let Some(err) = failure else {
        return;
    };
    warn!(target: "scene", "environment map failed to load ({err}); continuing with ambient light only");
    maps.failed = true;
    for cam in &q_cam {
        commands.entity(cam).remove::<EnvironmentMapLight>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_scales_with_material() {
        let cfg = SceneConfig::default();
        assert!((environment_intensity(&cfg) - 20_000.0 * 0.05).abs() < 1e-3);
        let mut off = cfg.clone();
        off.material.env_map_intensity = -2.0;
        assert_eq!(environment_intensity(&off), 0.0);
    }

    #[test]
    fn failed_map_falls_back_to_ambient() {
        let mut cfg = SceneConfig::default();
        cfg.environment.diffuse_map = "environment/not_there_diffuse.ktx2".into();
        cfg.environment.specular_map = "environment/not_there_specular.ktx2".into();
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .insert_resource(cfg)
            .add_plugins(EnvironmentPlugin);
        let cam = app.world_mut().spawn(SceneCamera).id();

        for _ in 0..200 {
            app.update();
            if app.world().resource::<EnvironmentMaps>().failed {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        app.update();
        assert!(app.world().resource::<EnvironmentMaps>().failed);
        assert!(app.world().get::<EnvironmentMapLight>(cam).is_none());
    }
}
