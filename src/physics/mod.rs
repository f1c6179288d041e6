pub mod rapier;
pub mod restoring;
