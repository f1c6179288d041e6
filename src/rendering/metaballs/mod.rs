pub mod field;
pub mod metaballs;
pub mod resources;
pub mod startup;
pub mod systems;
pub mod tables;

pub use field::{FieldMesh, IsosurfaceField};
pub use metaballs::MetaballsPlugin;
pub use resources::*;
