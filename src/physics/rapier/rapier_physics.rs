use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::config::SceneConfig;

/// Adds Rapier and keeps its world gravity in sync with the scene config.
/// Collider wireframes are switched by the debug render modes.
pub struct PhysicsSetupPlugin;

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .add_systems(Update, sync_gravity);
        #[cfg(feature = "debug")]
        app.add_plugins(RapierDebugRenderPlugin {
            enabled: false,
            ..default()
        });
    }
}

/// Rapier spawns its context entity during startup, so this runs every frame and
/// only writes on mismatch (first frame and after config reloads).
fn sync_gravity(cfg: Res<SceneConfig>, mut q: Query<&mut RapierConfiguration>) {
    let gravity = cfg.gravity();
    for mut rapier_cfg in &mut q {
        if rapier_cfg.gravity != gravity {
            rapier_cfg.gravity = gravity;
            info!(target: "physics", "gravity set to {gravity:?}");
        }
    }
}
