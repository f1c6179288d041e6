use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Glass Metaballs".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub fov_degrees: f32,
    pub background: String,
    pub hdr: bool,
    /// Screen-space transmission taps; transmissive surfaces seen through other
    /// transmissive surfaces need more than one.
    pub transmission_steps: usize,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            fov_degrees: 25.0,
            background: "#151520".into(),
            hdr: true,
            transmission_steps: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_color: String,
    /// Bevy ambient brightness (cd/m^2).
    pub ambient_brightness: f32,
}
impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: "white".into(),
            ambient_brightness: 400.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub enabled: bool,
    /// Provenance of the prefiltered maps below (informational only).
    pub source_url: String,
    pub diffuse_map: String,
    pub specular_map: String,
    /// Base light intensity; multiplied by `material.env_map_intensity`.
    pub intensity: f32,
}
impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_url: "https://dl.polyhaven.org/file/ph-assets/HDRIs/hdr/1k/industrial_workshop_foundry_1k.hdr".into(),
            diffuse_map: "environment_maps/industrial_workshop_foundry_diffuse_rgb9e5_zstd.ktx2".into(),
            specular_map: "environment_maps/industrial_workshop_foundry_specular_rgb9e5_zstd.ktx2".into(),
            intensity: 20_000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: [f32; 3],
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, 2.0, 0.0],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MetaballConfig {
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub collider_radius: f32,
    pub strength: f32,
    pub subtract: f32,
    /// Magnitude of the per-frame restoring impulse (scaled by the clamped frame delta).
    pub impulse_scale: f32,
    /// Frame delta clamp (seconds) applied before scaling the impulse.
    pub max_delta: f32,
    pub marker_radius: f32,
}
impl Default for MetaballConfig {
    fn default() -> Self {
        Self {
            linear_damping: 4.0,
            angular_damping: 0.95,
            collider_radius: 0.1,
            strength: 0.35,
            subtract: 6.0,
            impulse_scale: 0.05,
            max_delta: 0.1,
            marker_radius: 0.04,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PointerConfig {
    pub strength: f32,
    pub subtract: f32,
    pub color: String,
    pub collider_radius: f32,
    pub marker_radius: f32,
}
impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            strength: 0.5,
            subtract: 10.0,
            color: "white".into(),
            collider_radius: 0.1,
            marker_radius: 0.04,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub resolution: usize,
    pub max_poly_count: usize,
    pub isolation: f32,
    pub enable_colors: bool,
}
impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            resolution: 64,
            max_poly_count: 20_000,
            isolation: 80.0,
            enable_colors: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MaterialConfig {
    pub transmission: f32,
    pub thickness: f32,
    pub roughness: f32,
    pub ior: f32,
    pub chromatic_aberration: f32,
    pub anisotropy: f32,
    pub env_map_intensity: f32,
    pub distortion: f32,
    pub distortion_scale: f32,
    pub temporal_distortion: f32,
    pub iridescence: f32,
    pub iridescence_ior: f32,
    pub iridescence_thickness_range: [f32; 2],
}
impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            transmission: 0.9,
            thickness: 0.1,
            roughness: 0.0,
            ior: 1.5,
            chromatic_aberration: 0.3,
            anisotropy: 1.0,
            env_map_intensity: 0.05,
            distortion: 1.0,
            distortion_scale: 1.0,
            temporal_distortion: 0.1,
            iridescence: 1.0,
            iridescence_ior: 1.0,
            iridescence_thickness_range: [0.0, 1400.0],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BoundsConfig {
    /// Reference box edge lengths (the field's nominal extents).
    pub size: [f32; 3],
    pub margin: f32,
    /// Re-fit on window resize.
    pub observe: bool,
    /// Derive near/far planes from the fitted distance.
    pub clip: bool,
}
impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            size: [1.0, 1.0, 1.0],
            margin: 1.0,
            observe: true,
            clip: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallSpawnConfig {
    pub color: String,
    pub position: [f32; 3],
}
impl Default for BallSpawnConfig {
    fn default() -> Self {
        Self {
            color: "white".into(),
            position: [0.0, 0.0, 0.0],
        }
    }
}

fn default_balls() -> Vec<BallSpawnConfig> {
    [
        ("red", [1.0, 1.0, 0.5]),
        ("blue", [-1.0, -1.0, -0.5]),
        ("green", [2.0, 2.0, 0.5]),
        ("orange", [-2.0, -2.0, -0.5]),
        ("hotpink", [3.0, 3.0, 0.5]),
        ("aquamarine", [-3.0, -3.0, -0.5]),
    ]
    .into_iter()
    .map(|(color, position)| BallSpawnConfig {
        color: color.into(),
        position,
    })
    .collect()
}

/// Number of physics-driven contributors the scene is designed around.
pub const EXPECTED_BALL_COUNT: usize = 6;

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub environment: EnvironmentConfig,
    pub physics: PhysicsConfig,
    pub metaball: MetaballConfig,
    pub pointer: PointerConfig,
    pub field: FieldConfig,
    pub material: MaterialConfig,
    pub bounds: BoundsConfig,
    pub balls: Vec<BallSpawnConfig>,
    pub rapier_debug: bool,
}
impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            camera: Default::default(),
            lighting: Default::default(),
            environment: Default::default(),
            physics: Default::default(),
            metaball: Default::default(),
            pointer: Default::default(),
            field: Default::default(),
            material: Default::default(),
            bounds: Default::default(),
            balls: default_balls(),
            rapier_debug: false,
        }
    }
}

/// Outcome of config loading, kept around so startup can log it once logging is up.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConfigDiagnostics {
    pub used: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn log_config_diagnostics(diag: Option<Res<ConfigDiagnostics>>) {
    let Some(diag) = diag else {
        return;
    };
    if diag.used.is_empty() {
        info!(target: "config", "no config layers loaded; using built-in defaults");
    } else {
        info!(target: "config", "config layers: {}", diag.used.join(", "));
    }
    for e in &diag.errors {
        warn!(target: "config", "CONFIG load issue: {e}");
    }
    for w in &diag.warnings {
        warn!(target: "config", "CONFIG warning: {w}");
    }
}

impl SceneConfig {
    pub fn from_ron_str(data: &str) -> Result<Self, String> {
        ron::from_str(data).map_err(|e| format!("parse RON: {e}"))
    }
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        Self::from_ron_str(&data)
    }
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
    /// Merges RON layers in order (later maps override earlier keys, recursively)
    /// and deserializes the result. Returns the config, the layers used and any errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (SceneConfig::default(), used, errors);
        };
        match val.into_rust::<SceneConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (SceneConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        use crate::rendering::palette::palette::parse_color;
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        } else if self.window.auto_close > 0.0 && self.window.auto_close < 0.01 {
            w.push(format!(
                "window.autoClose {} very small; closes almost immediately",
                self.window.auto_close
            ));
        }
        if !(1.0..=170.0).contains(&self.camera.fov_degrees) {
            w.push(format!(
                "camera.fov_degrees {} outside 1..170",
                self.camera.fov_degrees
            ));
        }
        if self.camera.position == [0.0, 0.0, 0.0] {
            w.push("camera.position at origin; framing needs a view direction".into());
        }
        let mut check_color = |label: &str, value: &str| {
            if let Err(e) = parse_color(value) {
                w.push(format!("{label}: {e}"));
            }
        };
        check_color("camera.background", &self.camera.background);
        check_color("lighting.ambient_color", &self.lighting.ambient_color);
        check_color("pointer.color", &self.pointer.color);
        for (i, ball) in self.balls.iter().enumerate() {
            check_color(&format!("balls[{i}].color"), &ball.color);
        }
        if self.balls.len() != EXPECTED_BALL_COUNT {
            w.push(format!(
                "balls has {} entries; the scene is tuned for {EXPECTED_BALL_COUNT}",
                self.balls.len()
            ));
        }
        let g = self.physics.gravity;
        if g.iter().any(|c| c.abs() > 50.0) {
            w.push(format!(
                "physics.gravity {g:?} very large; bodies will leave the field quickly"
            ));
        }
        fn check_contributor(w: &mut Vec<String>, label: &str, strength: f32, subtract: f32) {
            if strength == 0.0 {
                w.push(format!("{label}.strength is 0; contributes nothing"));
            }
            if subtract <= 0.0 {
                w.push(format!(
                    "{label}.subtract must be > 0 (defines the radius of influence)"
                ));
            }
        }
        check_contributor(&mut w, "metaball", self.metaball.strength, self.metaball.subtract);
        check_contributor(&mut w, "pointer", self.pointer.strength, self.pointer.subtract);
        if self.metaball.linear_damping < 0.0 || self.metaball.angular_damping < 0.0 {
            w.push("metaball damping negative -> energy gain".into());
        }
        if self.metaball.collider_radius <= 0.0 || self.pointer.collider_radius <= 0.0 {
            w.push("collider_radius must be > 0".into());
        }
        if self.metaball.max_delta <= 0.0 {
            w.push(format!(
                "metaball.max_delta {} must be > 0 or impulses never apply",
                self.metaball.max_delta
            ));
        }
        if self.field.resolution < 4 {
            w.push(format!(
                "field.resolution {} too small (min 4)",
                self.field.resolution
            ));
        } else if self.field.resolution > 160 {
            w.push(format!(
                "field.resolution {} very high; per-frame extraction may stall",
                self.field.resolution
            ));
        }
        if self.field.max_poly_count == 0 {
            w.push("field.max_poly_count is 0; surface never renders".into());
        }
        if self.field.isolation <= 0.0 {
            w.push("field.isolation must be > 0".into());
        }
        let m = &self.material;
        if !(0.0..=1.0).contains(&m.transmission) {
            w.push(format!("material.transmission {} outside 0..1", m.transmission));
        }
        if !(0.0..=1.0).contains(&m.roughness) {
            w.push(format!("material.roughness {} outside 0..1", m.roughness));
        }
        if m.thickness < 0.0 {
            w.push("material.thickness negative".into());
        }
        if m.ior < 1.0 {
            w.push(format!("material.ior {} below 1.0", m.ior));
        }
        let [lo, hi] = m.iridescence_thickness_range;
        if lo > hi {
            w.push(format!(
                "material.iridescence_thickness_range min ({lo}) greater than max ({hi})"
            ));
        }
        if self.bounds.margin <= 0.0 {
            w.push("bounds.margin must be > 0".into());
        }
        if self.bounds.size.iter().any(|s| *s <= 0.0) {
            w.push(format!("bounds.size {:?} must be > 0 on every axis", self.bounds.size));
        }
        w
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.physics.gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_scene_constants() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.balls.len(), EXPECTED_BALL_COUNT);
        assert_eq!(cfg.balls[0].color, "red");
        assert_eq!(cfg.balls[5].position, [-3.0, -3.0, -0.5]);
        assert_eq!(cfg.field.resolution, 64);
        assert_eq!(cfg.field.max_poly_count, 20_000);
        assert_eq!(cfg.gravity(), Vec3::new(0.0, 2.0, 0.0));
        assert!((cfg.metaball.max_delta - 0.1).abs() < 1e-6);
        assert!(
            cfg.validate().is_empty(),
            "defaults should validate cleanly: {:?}",
            cfg.validate()
        );
    }

    #[test]
    fn parse_sample_config() {
        let sample = r##"(
            window: (width: 800.0, height: 600.0, title: "Sample"),
            camera: (fov_degrees: 30.0, background: "#000000"),
            field: (resolution: 48, max_poly_count: 5000),
            material: (transmission: 0.5, iridescence_thickness_range: (100.0, 800.0)),
            balls: [
                (color: "red", position: (0.5, 0.0, 0.0)),
                (color: "blue", position: (-0.5, 0.0, 0.0)),
            ],
        )"##;
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(sample.as_bytes()).unwrap();
        let cfg = SceneConfig::load_from_file(file.path()).expect("parse config");
        assert_eq!(cfg.window.width, 800.0);
        assert_eq!(cfg.field.resolution, 48);
        assert_eq!(cfg.balls.len(), 2);
        assert_eq!(cfg.material.iridescence_thickness_range, [100.0, 800.0]);
        // untouched sections keep defaults
        assert_eq!(cfg.pointer, PointerConfig::default());
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("balls has 2 entries")));
    }

    #[test]
    fn validate_detects_warnings() {
        let mut bad = SceneConfig::default();
        bad.window.width = -1.0;
        bad.camera.background = "not-a-colour".into();
        bad.metaball.subtract = 0.0;
        bad.field.resolution = 2;
        bad.field.max_poly_count = 0;
        bad.material.transmission = 1.5;
        bad.material.iridescence_thickness_range = [10.0, 1.0];
        bad.bounds.margin = 0.0;
        let joined = bad.validate().join(" | ");
        assert!(joined.contains("window dimensions must be > 0"));
        assert!(joined.contains("camera.background"));
        assert!(joined.contains("metaball.subtract must be > 0"));
        assert!(joined.contains("field.resolution 2 too small"));
        assert!(joined.contains("field.max_poly_count is 0"));
        assert!(joined.contains("material.transmission"));
        assert!(joined.contains("iridescence_thickness_range min (10"));
        assert!(joined.contains("bounds.margin"));
    }

    #[test]
    fn load_or_default_missing_file() {
        let (cfg, err) = SceneConfig::load_or_default("this/file/does/not/exist.ron");
        assert!(err.is_some());
        assert_eq!(cfg, SceneConfig::default());
    }

    #[test]
    fn layered_merge_overrides() {
        let base = r"(
            window: (width: 900.0),
            physics: (gravity: (0.0, 1.0, 0.0)),
            metaball: (strength: 0.4),
        )";
        let overlay = r#"(
            window: (title: "Custom Title"),
            metaball: (subtract: 8.0),
        )"#;
        let mut f1 = tempfile::NamedTempFile::new().unwrap();
        let mut f2 = tempfile::NamedTempFile::new().unwrap();
        f1.write_all(base.as_bytes()).unwrap();
        f2.write_all(overlay.as_bytes()).unwrap();
        let (cfg, used, errors) = SceneConfig::load_layered([f1.path(), f2.path()]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 2);
        assert_eq!(cfg.window.width, 900.0);
        assert_eq!(cfg.window.title, "Custom Title");
        // nested keys merge instead of replacing the whole section
        assert!((cfg.metaball.strength - 0.4).abs() < 1e-6);
        assert!((cfg.metaball.subtract - 8.0).abs() < 1e-6);
        assert_eq!(cfg.gravity(), Vec3::Y);
        assert_eq!(cfg.window.height, WindowConfig::default().height);
    }

    #[test]
    fn layered_collects_errors_and_keeps_good_layers() {
        let good = r"(field: (resolution: 32))";
        let mut f1 = tempfile::NamedTempFile::new().unwrap();
        let mut f2 = tempfile::NamedTempFile::new().unwrap();
        f1.write_all(good.as_bytes()).unwrap();
        f2.write_all(b"(field: (resolution: ").unwrap();
        let (cfg, used, errors) = SceneConfig::load_layered([f1.path(), f2.path()]);
        assert_eq!(used.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("parse error"));
        assert_eq!(cfg.field.resolution, 32);
    }

    #[test]
    fn parse_autoclose_and_validate() {
        let cfg = SceneConfig::from_ron_str(r"(window: (autoClose: 3.25))").expect("parse");
        assert!((cfg.window.auto_close - 3.25).abs() < 1e-6);
        let neg = SceneConfig::from_ron_str(r"(window: (autoClose: -5.0))").expect("parse");
        assert!(
            neg.validate().iter().any(|w| w.contains("window.autoClose")),
            "expected warning for negative autoClose"
        );
    }
}
