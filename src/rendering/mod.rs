pub mod camera;
pub mod environment;
pub mod materials;
pub mod metaballs;
pub mod palette;
