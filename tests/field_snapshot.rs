use bevy::prelude::*;

use glass_metaballs::core::config::SceneConfig;
use glass_metaballs::rendering::palette::palette::color_or_white;
use glass_metaballs::{Contributor, IsosurfaceField};

fn default_snapshot(cfg: &SceneConfig) -> Vec<(Vec3, Contributor)> {
    let m = &cfg.metaball;
    let mut out: Vec<_> = cfg
        .balls
        .iter()
        .map(|b| {
            (
                // Settled layout near the origin, inside the field's [-1, 1]^3 extent.
                Vec3::from_array(b.position) * 0.1,
                Contributor::new(m.strength, m.subtract, color_or_white(&b.color)),
            )
        })
        .collect();
    let p = &cfg.pointer;
    out.push((
        Vec3::new(0.3, -0.2, 0.0),
        Contributor::new(p.strength, p.subtract, color_or_white(&p.color)),
    ));
    out
}

fn field_from(cfg: &SceneConfig) -> IsosurfaceField {
    IsosurfaceField::new(cfg.field.resolution, cfg.field.max_poly_count, cfg.field.isolation)
        .with_colors(cfg.field.enable_colors)
}

#[test]
fn same_snapshot_same_mesh() {
    let cfg = SceneConfig::default();
    let snapshot = default_snapshot(&cfg);
    let mut a = field_from(&cfg);
    let mut b = field_from(&cfg);
    let mesh_a = a.rebuild(snapshot.iter().map(|(p, c)| (*p, c)));
    // Run the second field through a different frame first; nothing may carry over.
    b.rebuild(std::iter::once((Vec3::new(0.5, 0.5, 0.5), &snapshot[0].1)));
    let mesh_b = b.rebuild(snapshot.iter().map(|(p, c)| (*p, c)));
    assert!(mesh_a.triangle_count() > 0);
    assert_eq!(mesh_a, mesh_b);
}

#[test]
fn default_scene_stays_inside_budget() {
    let cfg = SceneConfig::default();
    let mut field = field_from(&cfg);
    let mesh = field.rebuild(default_snapshot(&cfg).iter().map(|(p, c)| (*p, c)));
    assert!(!mesh.truncated);
    assert!(mesh.triangle_count() <= cfg.field.max_poly_count);
    assert_eq!(mesh.colors.len(), mesh.positions.len());
    for p in &mesh.positions {
        assert!(p.iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}
