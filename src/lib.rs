pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::scene::ScenePlugin;
pub use core::components::{Contributor, MetaBall, PointerBody};
pub use core::config::{ConfigDiagnostics, SceneConfig, WindowConfig};
pub use rendering::metaballs::field::{FieldMesh, IsosurfaceField};
