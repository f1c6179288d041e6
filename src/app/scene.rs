use bevy::prelude::*;

use crate::core::config::log_config_diagnostics;
use crate::core::system::system_order::{PointerSampleSet, PrePhysicsSet};
use crate::debug::DebugPlugin;
use crate::gameplay::spawn::BallSpawnPlugin;
use crate::interaction::pointer::PointerPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::physics::restoring::RestoringImpulsePlugin;
use crate::rendering::camera::{BoundsPlugin, CameraPlugin};
use crate::rendering::environment::EnvironmentPlugin;
use crate::rendering::materials::GlassMaterialPlugin;
use crate::rendering::metaballs::MetaballsPlugin;

/// Composes the whole scene. Expects a `SceneConfig` resource to be inserted
/// before the plugin is added (field sizing reads it at build time).
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(Update, (PointerSampleSet, PrePhysicsSet).chain())
            .add_systems(Startup, log_config_diagnostics)
            .add_plugins((
                CameraPlugin,
                BoundsPlugin,
                EnvironmentPlugin,
                GlassMaterialPlugin,
                PhysicsSetupPlugin,
                RestoringImpulsePlugin,
                BallSpawnPlugin,
                PointerPlugin,
                MetaballsPlugin,
                DebugPlugin,
                ConfigHotReloadPlugin,
                AutoClosePlugin,
            ));
    }
}
