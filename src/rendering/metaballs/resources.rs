//! ECS resources for the isosurface field.
use bevy::prelude::*;

use crate::core::config::SceneConfig;
use crate::rendering::metaballs::field::IsosurfaceField;

/// When false the field is not rebuilt and the surface entity is hidden.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaballsToggle(pub bool);
impl Default for MetaballsToggle {
    fn default() -> Self {
        Self(true)
    }
}

/// The scalar field rebuilt every frame from the live contributors.
#[derive(Resource, Debug, Clone, Deref, DerefMut)]
pub struct MetaballField(pub IsosurfaceField);

impl MetaballField {
    pub fn from_config(cfg: &SceneConfig) -> Self {
        let f = &cfg.field;
        Self(
            IsosurfaceField::new(f.resolution, f.max_poly_count, f.isolation)
                .with_colors(f.enable_colors),
        )
    }
}

impl FromWorld for MetaballField {
    fn from_world(world: &mut World) -> Self {
        match world.get_resource::<SceneConfig>() {
            Some(cfg) => Self::from_config(cfg),
            None => Self::from_config(&SceneConfig::default()),
        }
    }
}

/// Per-frame extraction numbers, read by the debug overlay and logging.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    pub contributors: usize,
    pub triangles: usize,
    pub truncated: bool,
    /// Number of distinct runs of frames that hit the polygon budget.
    pub truncation_episodes: u32,
}
