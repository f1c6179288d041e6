//! Startup systems: surface mesh + glass material spawn.
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::view::NoFrustumCulling;

use crate::core::components::FieldSurface;
use crate::core::config::SceneConfig;
use crate::rendering::materials::glass::{glass_material, GlassMaterial};
use crate::rendering::metaballs::field::FieldMesh;
use crate::rendering::metaballs::resources::MetaballsToggle;
use crate::rendering::metaballs::systems::write_field_mesh;

/// A placeholder mesh in the layout the per-frame upload writes.
pub fn empty_field_mesh(colors: bool) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    write_field_mesh(&mut mesh, FieldMesh::default(), colors);
    mesh
}

pub fn setup_field_surface(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GlassMaterial>>,
    cfg: Res<SceneConfig>,
    toggle: Res<MetaballsToggle>,
) {
    let mesh = meshes.add(empty_field_mesh(cfg.field.enable_colors));
    let material = materials.add(glass_material(&cfg.material));
    // The mesh bounds change every frame; culling against stale AABBs drops the surface.
    commands.spawn((
        Name::new("MetaballSurface"),
        FieldSurface,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        if toggle.0 { Visibility::Inherited } else { Visibility::Hidden },
        NoFrustumCulling,
        NotShadowCaster,
    ));
    info!(
        target: "metaballs",
        "field surface spawned: resolution={} max_poly_count={} isolation={}",
        cfg.field.resolution, cfg.field.max_poly_count, cfg.field.isolation
    );
}
