use std::fs;
use std::path::Path;

use glass_metaballs::core::config::{SceneConfig, EXPECTED_BALL_COUNT};

#[test]
fn shipped_scene_ron_matches_defaults() {
    let cfg = SceneConfig::load_from_file("assets/config/scene.ron").expect("scene.ron parses");
    assert_eq!(cfg, SceneConfig::default());
    assert!(cfg.validate().is_empty(), "warnings: {:?}", cfg.validate());
    assert_eq!(cfg.ball_count(), EXPECTED_BALL_COUNT);
}

#[test]
fn local_layer_overrides_nested_keys() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("scene.local.ron");
    fs::write(
        &local,
        r#"(
            camera: (fov_degrees: 40.0),
            field: (resolution: 32),
            window: (autoClose: 3.0),
        )"#,
    )
    .unwrap();
    let (cfg, used, errors) =
        SceneConfig::load_layered([Path::new("assets/config/scene.ron"), local.as_path()]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 2);
    assert_eq!(cfg.camera.fov_degrees, 40.0);
    assert_eq!(cfg.camera.background, "#151520");
    assert_eq!(cfg.field.resolution, 32);
    assert_eq!(cfg.field.max_poly_count, 20_000);
    assert_eq!(cfg.window.auto_close, 3.0);
    assert_eq!(cfg.balls.len(), 6);
}

#[test]
fn broken_layer_is_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.ron");
    fs::write(&bad, "(camera: (fov_degrees: ").unwrap();
    let (cfg, used, errors) =
        SceneConfig::load_layered([Path::new("assets/config/scene.ron"), bad.as_path()]);
    assert_eq!(used.len(), 1);
    assert_eq!(errors.len(), 1);
    assert_eq!(cfg.camera.fov_degrees, 25.0);
}
