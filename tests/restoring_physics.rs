use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use glass_metaballs::core::components::{MetaBall, PointerBody};
use glass_metaballs::core::config::{BallSpawnConfig, SceneConfig};
use glass_metaballs::gameplay::spawn::BallSpawnPlugin;
use glass_metaballs::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use glass_metaballs::physics::restoring::RestoringImpulsePlugin;

const STEPS_PER_SECOND: usize = 60;

fn physics_app(start: Vec3) -> App {
    let mut cfg = SceneConfig::default();
    cfg.balls = vec![BallSpawnConfig {
        color: "red".into(),
        position: start.to_array(),
    }];
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        TransformPlugin,
        AssetPlugin::default(),
        bevy::scene::ScenePlugin,
    ))
    .init_asset::<Shader>()
    .add_plugins(bevy::gizmos::GizmoPlugin)
    .init_asset::<Mesh>()
        .init_resource::<Assets<StandardMaterial>>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / STEPS_PER_SECOND as f64,
        )))
        .insert_resource(cfg)
        .add_plugins((PhysicsSetupPlugin, RestoringImpulsePlugin, BallSpawnPlugin));
    app.update();
    // Only the restoring impulse and gravity act on the ball.
    let pointers: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<PointerBody>>()
        .iter(app.world())
        .collect();
    for e in pointers {
        app.world_mut().despawn(e);
    }
    app
}

fn ball_distance(app: &mut App) -> f32 {
    app.world_mut()
        .query_filtered::<&Transform, With<MetaBall>>()
        .single(app.world())
        .unwrap()
        .translation
        .length()
}

#[test]
fn ball_settles_toward_origin_under_rapier() {
    let mut app = physics_app(Vec3::new(3.0, 3.0, 0.5));
    let mut distances = vec![ball_distance(&mut app)];
    for _ in 0..8 {
        for _ in 0..STEPS_PER_SECOND {
            app.update();
        }
        distances.push(ball_distance(&mut app));
    }
    assert!(distances[0] > 4.0, "ball should start far out: {distances:?}");
    for pair in distances.windows(2) {
        if pair[0] > 0.3 {
            assert!(pair[1] <= pair[0] + 1e-3, "distance grew: {distances:?}");
        }
    }
    let last = *distances.last().unwrap();
    assert!(last < 0.3, "did not settle: {distances:?}");
}

#[test]
fn ball_at_origin_stays_near_origin() {
    let mut app = physics_app(Vec3::ZERO);
    for _ in 0..(3 * STEPS_PER_SECOND) {
        app.update();
    }
    assert!(ball_distance(&mut app) < 0.3);
}
