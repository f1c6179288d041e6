//! Frames the camera around a fixed reference box.
//!
//! An invisible proxy cuboid marks the box. The fit runs once both camera and
//! proxy exist, then again on every window resize when `observe` is set. It
//! never reads contributor state, so pointer motion cannot move the camera.
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use std::f32::consts::PI;

use crate::core::components::SceneCamera;
use crate::core::config::{BoundsConfig, SceneConfig};

/// Reference box centred on the entity's translation.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoundsProxy {
    pub size: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFit {
    pub position: Vec3,
    pub target: Vec3,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

/// Distance at which a box of `size` fits a vertical `fov_degrees` view.
pub fn fit_distance(size: Vec3, fov_degrees: f32, aspect: f32, margin: f32) -> f32 {
    let max_size = size.max_element();
    let fit_height = max_size / (2.0 * (PI * fov_degrees / 360.0).atan());
    let fit_width = fit_height / aspect.max(f32::EPSILON);
    margin * fit_height.max(fit_width)
}

/// Keeps the camera's current view direction and moves it to the fitted distance.
pub fn fit_camera(
    camera_position: Vec3,
    center: Vec3,
    size: Vec3,
    fov_degrees: f32,
    aspect: f32,
    margin: f32,
) -> CameraFit {
    let distance = fit_distance(size, fov_degrees, aspect, margin);
    let dir = (camera_position - center).try_normalize().unwrap_or(Vec3::Z);
    CameraFit {
        position: center + dir * distance,
        target: center,
        distance,
        near: distance / 100.0,
        far: distance * 100.0,
    }
}

pub struct BoundsPlugin;

impl Plugin for BoundsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_bounds_proxy)
            .add_systems(Update, fit_camera_to_bounds);
    }
}

fn spawn_bounds_proxy(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    cfg: Res<SceneConfig>,
) {
    let size = Vec3::from_array(cfg.bounds.size);
    commands.spawn((
        Name::new("BoundsProxy"),
        BoundsProxy { size },
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        Transform::IDENTITY,
        Visibility::Hidden,
    ));
}

fn window_aspect(window: Option<&Window>, cfg: &SceneConfig) -> f32 {
    match window {
        Some(w) if w.height() > 0.0 => w.width() / w.height(),
        _ if cfg.window.height > 0.0 => cfg.window.width / cfg.window.height,
        _ => 1.0,
    }
}

fn apply_fit(
    fit: &CameraFit,
    bounds: &BoundsConfig,
    tf: &mut Transform,
    projection: &mut Projection,
) {
    *tf = Transform::from_translation(fit.position).looking_at(fit.target, Vec3::Y);
    if bounds.clip {
        if let Projection::Perspective(p) = projection {
            p.near = fit.near;
            p.far = fit.far;
        }
    }
}

pub fn fit_camera_to_bounds(
    cfg: Res<SceneConfig>,
    mut fitted: Local<bool>,
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    proxies: Query<(&Transform, &BoundsProxy), Without<SceneCamera>>,
    mut cameras: Query<(&mut Transform, &mut Projection), With<SceneCamera>>,
) {
    let resized = resized.read().count() > 0;
    if *fitted && !(resized && cfg.bounds.observe) {
        return;
    }
    let Ok((proxy_tf, proxy)) = proxies.single() else {
        return;
    };
    let Ok((mut tf, mut projection)) = cameras.single_mut() else {
        return;
    };
    let fov_degrees = match &*projection {
        Projection::Perspective(p) => p.fov.to_degrees(),
        _ => cfg.camera.fov_degrees,
    };
    let aspect = window_aspect(windows.single().ok(), &cfg);
    let fit = fit_camera(
        tf.translation,
        proxy_tf.translation,
        proxy.size,
        fov_degrees,
        aspect,
        cfg.bounds.margin,
    );
    apply_fit(&fit, &cfg.bounds, &mut tf, &mut projection);
    *fitted = true;
    info!(
        target: "scene",
        "camera fitted: distance={:.3} aspect={:.3} near={:.4} far={:.1}",
        fit.distance, aspect, fit.near, fit.far
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_follows_fov_formula() {
        let d = fit_distance(Vec3::ONE, 25.0, 0.5, 1.0);
        let fit_h = 1.0 / (2.0 * (PI * 25.0 / 360.0).atan());
        assert!((d - fit_h * 2.0).abs() < 1e-5, "portrait uses the width fit");
        let wide = fit_distance(Vec3::ONE, 25.0, 2.0, 1.0);
        assert!((wide - fit_h).abs() < 1e-5);
        let margin = fit_distance(Vec3::ONE, 25.0, 2.0, 1.5);
        assert!((margin - 1.5 * fit_h).abs() < 1e-5);
    }

    #[test]
    fn uses_largest_box_edge() {
        let a = fit_distance(Vec3::new(1.0, 3.0, 2.0), 25.0, 2.0, 1.0);
        let b = fit_distance(Vec3::splat(3.0), 25.0, 2.0, 1.0);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn keeps_view_direction_and_clip_planes() {
        let fit = fit_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::ONE, 25.0, 1.5, 1.0);
        assert!(fit.position.x.abs() < 1e-6 && fit.position.y.abs() < 1e-6);
        assert!((fit.position.z - fit.distance).abs() < 1e-5);
        assert!((fit.near - fit.distance / 100.0).abs() < 1e-6);
        assert!((fit.far - fit.distance * 100.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_camera_position_falls_back_to_z() {
        let fit = fit_camera(Vec3::ZERO, Vec3::ZERO, Vec3::ONE, 25.0, 1.0, 1.0);
        assert!(fit.position.z > 0.0);
    }
}
