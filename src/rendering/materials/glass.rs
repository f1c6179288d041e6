//! Transmissive glass material for the isosurface: `StandardMaterial` for the
//! transmission/ior/thickness model, plus an extension carrying the iridescence
//! and animated distortion parameters.
use bevy::core_pipeline::post_process::ChromaticAberration;
use bevy::pbr::{ExtendedMaterial, MaterialExtension, MaterialPlugin};
use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};

use crate::core::config::MaterialConfig;

#[cfg(target_arch = "wasm32")]
use std::sync::OnceLock;
#[cfg(target_arch = "wasm32")]
static GLASS_SHADER_HANDLE: OnceLock<Handle<Shader>> = OnceLock::new();

pub const GLASS_SHADER_PATH: &str = "shaders/glass_extension.wgsl";

/// Maps the config's 0..1 chromatic aberration onto the post-process intensity.
pub const CHROMATIC_ABERRATION_SCALE: f32 = 0.1;

pub type GlassMaterial = ExtendedMaterial<StandardMaterial, GlassExtension>;

#[derive(Clone, Copy, ShaderType, Reflect, Debug, Default, PartialEq)]
pub struct GlassUniform {
    /// (strength, film ior, min thickness nm, max thickness nm)
    pub iridescence: Vec4,
    /// (amount, noise scale, temporal speed, elapsed seconds)
    pub distortion: Vec4,
    pub anisotropy: f32,
}

impl GlassUniform {
    pub fn from_config(cfg: &MaterialConfig) -> Self {
        let [lo, hi] = cfg.iridescence_thickness_range;
        Self {
            iridescence: Vec4::new(cfg.iridescence, cfg.iridescence_ior, lo, hi),
            distortion: Vec4::new(cfg.distortion, cfg.distortion_scale, cfg.temporal_distortion, 0.0),
            anisotropy: cfg.anisotropy,
        }
    }
}

#[derive(Asset, AsBindGroup, Reflect, Debug, Clone, Default)]
pub struct GlassExtension {
    #[uniform(100)]
    pub params: GlassUniform,
}

impl MaterialExtension for GlassExtension {
    fn fragment_shader() -> ShaderRef {
        #[cfg(target_arch = "wasm32")]
        {
            return GLASS_SHADER_HANDLE
                .get()
                .cloned()
                .map(ShaderRef::Handle)
                .unwrap_or_else(|| ShaderRef::Path(GLASS_SHADER_PATH.into()));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            GLASS_SHADER_PATH.into()
        }
    }
}

fn glass_base(cfg: &MaterialConfig) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        specular_transmission: cfg.transmission,
        diffuse_transmission: 0.0,
        thickness: cfg.thickness,
        ior: cfg.ior,
        perceptual_roughness: cfg.roughness,
        metallic: 0.0,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

pub fn glass_material(cfg: &MaterialConfig) -> GlassMaterial {
    ExtendedMaterial {
        base: glass_base(cfg),
        extension: GlassExtension {
            params: GlassUniform::from_config(cfg),
        },
    }
}

/// Reapplies config values, keeping the running distortion clock.
pub fn apply_material_config(material: &mut GlassMaterial, cfg: &MaterialConfig) {
    let time = material.extension.params.distortion.w;
    material.base = glass_base(cfg);
    material.extension.params = GlassUniform::from_config(cfg);
    material.extension.params.distortion.w = time;
}

pub fn chromatic_aberration(cfg: &MaterialConfig) -> ChromaticAberration {
    ChromaticAberration {
        intensity: cfg.chromatic_aberration.max(0.0) * CHROMATIC_ABERRATION_SCALE,
        ..default()
    }
}

pub fn advance_glass_time(
    time: Res<Time>,
    q: Query<&MeshMaterial3d<GlassMaterial>>,
    mut materials: ResMut<Assets<GlassMaterial>>,
) {
    let t = time.elapsed_secs();
    for handle in &q {
        if let Some(mat) = materials.get_mut(&handle.0) {
            mat.extension.params.distortion.w = t;
        }
    }
}

pub struct GlassMaterialPlugin;

impl Plugin for GlassMaterialPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(target_arch = "wasm32")]
        {
            use bevy::asset::Assets;
            use bevy::render::render_resource::Shader;
            let mut shaders = app.world_mut().resource_mut::<Assets<Shader>>();
            let handle = shaders.add(Shader::from_wgsl(
                include_str!("../../../assets/shaders/glass_extension.wgsl"),
                "glass_extension_embedded.wgsl",
            ));
            let _ = GLASS_SHADER_HANDLE.set(handle);
        }
        app.add_plugins(MaterialPlugin::<GlassMaterial>::default())
            .add_systems(Update, advance_glass_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_carries_config_values() {
        let cfg = MaterialConfig::default();
        let mat = glass_material(&cfg);
        assert_eq!(mat.base.specular_transmission, 0.9);
        assert_eq!(mat.base.thickness, 0.1);
        assert_eq!(mat.base.ior, 1.5);
        assert_eq!(mat.base.perceptual_roughness, 0.0);
        let p = mat.extension.params;
        assert_eq!(p.iridescence, Vec4::new(1.0, 1.0, 0.0, 1400.0));
        assert_eq!(p.distortion, Vec4::new(1.0, 1.0, 0.1, 0.0));
        assert_eq!(p.anisotropy, 1.0);
    }

    #[test]
    fn reapply_keeps_clock() {
        let mut mat = glass_material(&MaterialConfig::default());
        mat.extension.params.distortion.w = 12.5;
        let cfg = MaterialConfig {
            ior: 1.2,
            distortion: 0.5,
            ..Default::default()
        };
        apply_material_config(&mut mat, &cfg);
        assert_eq!(mat.base.ior, 1.2);
        assert_eq!(mat.extension.params.distortion.x, 0.5);
        assert_eq!(mat.extension.params.distortion.w, 12.5);
    }

    #[test]
    fn aberration_scales_and_clamps() {
        let cfg = MaterialConfig::default();
        assert!((chromatic_aberration(&cfg).intensity - 0.03).abs() < 1e-6);
        let neg = MaterialConfig {
            chromatic_aberration: -1.0,
            ..Default::default()
        };
        assert_eq!(chromatic_aberration(&neg).intensity, 0.0);
    }
}
