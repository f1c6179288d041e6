use bevy::prelude::*;
use bevy_rapier3d::prelude::PhysicsSet;

use crate::core::system::system_order::FieldUpdateSet;
use crate::rendering::metaballs::resources::*;
use crate::rendering::metaballs::startup::setup_field_surface;
use crate::rendering::metaballs::systems::{apply_toggle_visibility, rebuild_field_surface};

/// Rebuilds the isosurface once per frame from the final body positions and
/// uploads it to the surface mesh.
pub struct MetaballsPlugin;

impl Plugin for MetaballsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MetaballsToggle>()
            .init_resource::<MetaballField>()
            .init_resource::<FieldStats>()
            .configure_sets(
                PostUpdate,
                FieldUpdateSet.after(PhysicsSet::Writeback),
            )
            .add_systems(Startup, setup_field_surface)
            .add_systems(
                PostUpdate,
                (rebuild_field_surface, apply_toggle_visibility)
                    .chain()
                    .in_set(FieldUpdateSet),
            );
    }
}
