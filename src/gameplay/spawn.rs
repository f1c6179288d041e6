use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::components::{Contributor, MarkerVisual, MetaBall, PointerBody};
use crate::core::config::{SceneConfig, EXPECTED_BALL_COUNT};
use crate::rendering::palette::palette::color_or_white;

pub struct BallSpawnPlugin;

impl Plugin for BallSpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_bodies);
    }
}

fn marker(mesh: &Handle<Mesh>, material: &Handle<StandardMaterial>, radius: f32) -> impl Bundle {
    (
        MarkerVisual,
        Mesh3d(mesh.clone()),
        MeshMaterial3d(material.clone()),
        Transform::from_scale(Vec3::splat(radius)),
    )
}

pub fn spawn_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<SceneConfig>,
) {
    let sphere = meshes.add(Sphere::new(1.0).mesh().uv(16, 12));
    let marker_mat = materials.add(StandardMaterial {
        base_color: Color::BLACK,
        unlit: true,
        ..default()
    });
    let m = &cfg.metaball;

    if cfg.balls.len() != EXPECTED_BALL_COUNT {
        warn!(
            target: "scene",
            "spawning {} metaballs (scene is tuned for {EXPECTED_BALL_COUNT})",
            cfg.balls.len()
        );
    }
    for (i, ball) in cfg.balls.iter().enumerate() {
        let color = color_or_white(&ball.color);
        commands
            .spawn((
                Name::new(format!("MetaBall{i}")),
                MetaBall,
                Contributor::new(m.strength, m.subtract, color),
                Transform::from_translation(Vec3::from_array(ball.position)),
                Visibility::default(),
                RigidBody::Dynamic,
                Collider::ball(m.collider_radius),
                Damping {
                    linear_damping: m.linear_damping,
                    angular_damping: m.angular_damping,
                },
                Velocity::zero(),
                ExternalImpulse::default(),
            ))
            .with_children(|parent| {
                parent.spawn(marker(&sphere, &marker_mat, m.marker_radius));
            });
    }

    let p = &cfg.pointer;
    commands
        .spawn((
            Name::new("PointerBody"),
            PointerBody,
            Contributor::new(p.strength, p.subtract, color_or_white(&p.color)),
            Transform::IDENTITY,
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::ball(p.collider_radius),
        ))
        .with_children(|parent| {
            parent.spawn(marker(&sphere, &marker_mat, p.marker_radius));
        });

    info!(target: "scene", "spawned {} metaballs + pointer body", cfg.balls.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn spawned_app(cfg: SceneConfig) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<Assets<Mesh>>();
        app.init_resource::<Assets<StandardMaterial>>();
        app.insert_resource(cfg);
        app.world_mut().run_system_once(spawn_bodies).unwrap();
        app
    }

    #[test]
    fn default_scene_has_seven_contributors() {
        let mut app = spawned_app(SceneConfig::default());
        let world = app.world_mut();
        assert_eq!(world.query::<&Contributor>().iter(world).count(), 7);
        assert_eq!(world.query::<&MetaBall>().iter(world).count(), 6);
        assert_eq!(world.query::<&PointerBody>().iter(world).count(), 1);
        assert_eq!(world.query::<&MarkerVisual>().iter(world).count(), 7);
    }

    #[test]
    fn bodies_carry_configured_physics() {
        let mut app = spawned_app(SceneConfig::default());
        let world = app.world_mut();
        let mut q = world
            .query_filtered::<(&Transform, &Damping, &Contributor, &RigidBody), With<MetaBall>>();
        let mut positions = Vec::new();
        for (tf, damping, contrib, body) in q.iter(world) {
            assert_eq!(damping.linear_damping, 4.0);
            assert_eq!(damping.angular_damping, 0.95);
            assert_eq!(contrib.strength, 0.35);
            assert_eq!(contrib.subtract, 6.0);
            assert_eq!(*body, RigidBody::Dynamic);
            positions.push(tf.translation);
        }
        assert!(positions.contains(&Vec3::new(-3.0, -3.0, -0.5)));
        assert!(positions.contains(&Vec3::new(1.0, 1.0, 0.5)));

        let (contrib, body) = world
            .query_filtered::<(&Contributor, &RigidBody), With<PointerBody>>()
            .single(world)
            .unwrap();
        assert_eq!(*body, RigidBody::KinematicPositionBased);
        assert_eq!((contrib.strength, contrib.subtract), (0.5, 10.0));
        assert_eq!(contrib.color, LinearRgba::WHITE);
    }
}
