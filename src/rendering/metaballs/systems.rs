//! Per-frame field accumulation, extraction and mesh upload.
use bevy::prelude::*;

use crate::core::components::{Contributor, FieldSurface};
use crate::rendering::metaballs::field::FieldMesh;
use crate::rendering::metaballs::resources::*;

/// Writes `field_mesh` into `mesh` as non-indexed position/normal(/colour) buffers.
/// No UVs are emitted. An empty extraction becomes a single degenerate triangle
/// so the vertex buffers never go zero-length.
pub fn write_field_mesh(mesh: &mut Mesh, field_mesh: FieldMesh, colors: bool) {
    let FieldMesh {
        positions,
        normals,
        colors: vertex_colors,
        ..
    } = if field_mesh.is_empty() {
        FieldMesh {
            positions: vec![[0.0; 3]; 3],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            colors: if colors { vec![[0.0; 4]; 3] } else { Vec::new() },
            truncated: false,
        }
    } else {
        field_mesh
    };
    mesh.remove_indices();
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    if colors && !vertex_colors.is_empty() {
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colors);
    } else {
        mesh.remove_attribute(Mesh::ATTRIBUTE_COLOR);
    }
}

pub fn rebuild_field_surface(
    toggle: Res<MetaballsToggle>,
    mut field: ResMut<MetaballField>,
    mut stats: ResMut<FieldStats>,
    q_contrib: Query<(&Transform, &Contributor)>,
    q_surface: Query<&Mesh3d, With<FieldSurface>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    if !toggle.0 {
        return;
    }
    let Ok(mesh3d) = q_surface.single() else {
        return;
    };
    let extracted = field.rebuild(q_contrib.iter().map(|(t, c)| (t.translation, c)));

    let was_truncated = stats.truncated;
    stats.contributors = q_contrib.iter().len();
    stats.triangles = extracted.triangle_count();
    stats.truncated = extracted.truncated;
    if extracted.truncated && !was_truncated {
        stats.truncation_episodes += 1;
        warn!(
            target: "metaballs",
            "isosurface hit the polygon budget ({} triangles); surface is incomplete",
            field.max_poly_count()
        );
    }

    let colors = field.colors_enabled();
    let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
        return;
    };
    write_field_mesh(mesh, extracted, colors);
}

pub fn apply_toggle_visibility(
    toggle: Res<MetaballsToggle>,
    mut q_surface: Query<&mut Visibility, With<FieldSurface>>,
) {
    if !toggle.is_changed() {
        return;
    }
    for mut vis in &mut q_surface {
        *vis = if toggle.0 { Visibility::Inherited } else { Visibility::Hidden };
    }
}
