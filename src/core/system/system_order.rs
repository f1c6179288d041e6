//! Central system ordering labels to make the frame sequence explicit.
//! Stages (high-level):
//! 1. PointerSample (read cursor / touch into `PointerState`)
//! 2. PrePhysics (restoring impulses, kinematic pointer target)
//! 3. Rapier (PostUpdate, handled by plugin)
//! 4. FieldUpdate (PostUpdate after Rapier writeback: accumulate + extract isosurface)
//! 5. Rendering (implicit)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PointerSampleSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet; // impulses / kinematic targets written before the physics step

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct FieldUpdateSet; // reads final body positions, never writes them
