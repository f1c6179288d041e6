pub mod config;

pub use config::{
    log_config_diagnostics, BallSpawnConfig, BoundsConfig, CameraConfig, ConfigDiagnostics,
    EnvironmentConfig, FieldConfig, LightingConfig, MaterialConfig, MetaballConfig,
    PhysicsConfig, PointerConfig, SceneConfig, WindowConfig, EXPECTED_BALL_COUNT,
};
