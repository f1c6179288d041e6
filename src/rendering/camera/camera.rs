use bevy::prelude::*;

use crate::core::components::SceneCamera;
use crate::core::config::SceneConfig;
use crate::rendering::materials::glass::chromatic_aberration;
use crate::rendering::palette::palette::color_or_white;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, setup_lighting));
    }
}

pub fn camera_bundle(cfg: &SceneConfig) -> impl Bundle {
    let [x, y, z] = cfg.camera.position;
    (
        Name::new("SceneCamera"),
        SceneCamera,
        Camera3d {
            screen_space_specular_transmission_steps: cfg.camera.transmission_steps,
            ..default()
        },
        Camera {
            hdr: cfg.camera.hdr,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: cfg.camera.fov_degrees.to_radians(),
            ..default()
        }),
        Transform::from_xyz(x, y, z).looking_at(Vec3::ZERO, Vec3::Y),
        chromatic_aberration(&cfg.material),
    )
}

fn setup_camera(mut commands: Commands, cfg: Res<SceneConfig>) {
    commands.spawn(camera_bundle(&cfg));
    commands.insert_resource(ClearColor(color_or_white(&cfg.camera.background)));
}

fn setup_lighting(mut commands: Commands, cfg: Res<SceneConfig>) {
    commands.insert_resource(AmbientLight {
        color: color_or_white(&cfg.lighting.ambient_color),
        brightness: cfg.lighting.ambient_brightness,
        ..default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn camera_uses_configured_view() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SceneConfig::default());
        app.world_mut().run_system_once(setup_camera).unwrap();
        app.world_mut().run_system_once(setup_lighting).unwrap();

        let (tf, proj) = app
            .world_mut()
            .query_filtered::<(&Transform, &Projection), With<SceneCamera>>()
            .single(app.world())
            .unwrap();
        assert_eq!(tf.translation, Vec3::new(0.0, 0.0, 5.0));
        match proj {
            Projection::Perspective(p) => assert!((p.fov - 25f32.to_radians()).abs() < 1e-6),
            other => panic!("unexpected projection {other:?}"),
        }
        let clear = app.world().resource::<ClearColor>().0.to_srgba();
        assert!((clear.red - 0x15 as f32 / 255.0).abs() < 1e-4);
        assert_eq!(app.world().resource::<AmbientLight>().brightness, 400.0);
    }
}
