pub mod glass;

pub use glass::{GlassMaterial, GlassMaterialPlugin};
