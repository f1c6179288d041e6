//! Debug module: feature gated render modes and stats/logging.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
pub mod keys; // pub for testing
#[cfg(feature = "debug")]
mod logging;
#[cfg(feature = "debug")]
mod modes;
#[cfg(feature = "debug")]
mod stats;

#[cfg(feature = "debug")]
pub use modes::*;

#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use crate::core::system::system_order::FieldUpdateSet;

#[cfg(feature = "debug")]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DebugPreRenderSet;

#[cfg(feature = "debug")]
pub struct DebugPlugin;
#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        use keys::debug_key_input_system;
        use logging::debug_logging_system;
        use modes::apply_mode_system;
        use stats::debug_stats_collect_system;

        app.init_resource::<modes::DebugState>()
            .init_resource::<modes::DebugStats>()
            .configure_sets(PostUpdate, DebugPreRenderSet.after(FieldUpdateSet))
            .add_systems(Update, (debug_key_input_system, apply_mode_system).chain())
            .add_systems(
                PostUpdate,
                (debug_stats_collect_system, debug_logging_system)
                    .chain()
                    .in_set(DebugPreRenderSet),
            );
    }
}

#[cfg(not(feature = "debug"))]
pub struct DebugPlugin;
#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for DebugPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}
