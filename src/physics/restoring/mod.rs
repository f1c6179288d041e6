pub mod restoring;

pub use restoring::{restoring_impulse, RestoringImpulsePlugin};
