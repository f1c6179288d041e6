pub mod bounds;
pub mod camera;

pub use bounds::{BoundsPlugin, BoundsProxy};
pub use camera::CameraPlugin;
