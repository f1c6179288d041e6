use bevy::prelude::*;

/// Marker for a physics-driven metaball (dynamic body pulled back toward the origin).
#[derive(Component, Debug, Default)]
pub struct MetaBall;

/// Marker for the kinematic body that follows the pointer.
#[derive(Component, Debug, Default)]
pub struct PointerBody;

/// Isosurface contribution of an entity. The position is read from the entity's
/// `Transform`, which Rapier writes back every step.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Contributor {
    pub strength: f32,
    /// Falloff offset; together with `strength` it sets the radius of influence
    /// (`sqrt(strength / subtract)` in field units).
    pub subtract: f32,
    pub color: LinearRgba,
}

impl Contributor {
    pub fn new(strength: f32, subtract: f32, color: impl Into<LinearRgba>) -> Self {
        Self {
            strength,
            subtract,
            color: color.into(),
        }
    }
}

/// Tag for the small black sphere child drawn at each body centre.
#[derive(Component, Debug, Default)]
pub struct MarkerVisual;

/// Tag for the entity carrying the extracted isosurface mesh.
#[derive(Component, Debug, Default)]
pub struct FieldSurface;

/// Tag for the scene camera.
#[derive(Component, Debug, Default)]
pub struct SceneCamera;
