//! Pointer → world mapping for the kinematic pointer body.
//!
//! The pointer is tracked in normalized device coordinates and projected onto
//! the `z = 0` plane using the viewport extents at the camera's distance from
//! the origin. Touch wins over the mouse; with neither, the last NDC is kept.
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::components::{PointerBody, SceneCamera};
use crate::core::system::system_order::{PointerSampleSet, PrePhysicsSet};

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Pointer in NDC, `[-1, 1]^2`, y up.
    pub ndc: Vec2,
    /// Half width / half height of the visible `z = 0` plane.
    pub half_extents: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            ndc: Vec2::ZERO,
            half_extents: Vec2::ONE,
        }
    }
}

impl PointerState {
    pub fn target(&self) -> Vec3 {
        pointer_target(self.ndc, self.half_extents)
    }
}

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>().add_systems(
            Update,
            (
                sample_pointer.in_set(PointerSampleSet),
                drive_pointer_body.in_set(PrePhysicsSet),
            ),
        );
    }
}

/// Window pixel position (origin top-left) to NDC (origin centre, y up).
pub fn cursor_to_ndc(cursor: Vec2, window_size: Vec2) -> Vec2 {
    if window_size.x <= 0.0 || window_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        cursor.x / window_size.x * 2.0 - 1.0,
        -(cursor.y / window_size.y * 2.0 - 1.0),
    )
}

/// Half extents of the view frustum cross-section at `distance`.
pub fn viewport_half_extents(fov_y: f32, distance: f32, aspect: f32) -> Vec2 {
    let height = 2.0 * distance * (fov_y * 0.5).tan();
    Vec2::new(height * aspect, height) * 0.5
}

pub fn pointer_target(ndc: Vec2, half_extents: Vec2) -> Vec3 {
    (ndc * half_extents).extend(0.0)
}

pub fn sample_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    touches: Option<Res<Touches>>,
    cameras: Query<(&Transform, &Projection), With<SceneCamera>>,
    mut state: ResMut<PointerState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = window.size();
    let screen = touches
        .as_deref()
        .and_then(|t| t.iter().next().map(|touch| touch.position()))
        .or_else(|| window.cursor_position());
    if let Some(pos) = screen {
        state.ndc = cursor_to_ndc(pos, size);
    }

    let Ok((cam_tf, projection)) = cameras.single() else {
        return;
    };
    if let Projection::Perspective(p) = projection {
        let aspect = if size.y > 0.0 { size.x / size.y } else { p.aspect_ratio };
        state.half_extents = viewport_half_extents(p.fov, cam_tf.translation.length(), aspect);
    }
}

/// Kinematic position-based body: Rapier reads the new `Transform` as its next pose.
pub fn drive_pointer_body(
    state: Res<PointerState>,
    mut q: Query<&mut Transform, With<PointerBody>>,
) {
    let target = state.target();
    for mut tf in &mut q {
        tf.translation = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::window::WindowResolution;

    #[test]
    fn ndc_corners_and_centre() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(cursor_to_ndc(Vec2::new(400.0, 300.0), size), Vec2::ZERO);
        assert_eq!(cursor_to_ndc(Vec2::ZERO, size), Vec2::new(-1.0, 1.0));
        assert_eq!(cursor_to_ndc(size, size), Vec2::new(1.0, -1.0));
        assert_eq!(cursor_to_ndc(Vec2::ONE, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn half_extents_match_frustum() {
        let fov = 25f32.to_radians();
        let he = viewport_half_extents(fov, 5.0, 2.0);
        let h = 2.0 * 5.0 * (fov / 2.0).tan();
        assert!((he.y - h / 2.0).abs() < 1e-6);
        assert!((he.x - h).abs() < 1e-6);
    }

    #[test]
    fn target_lies_on_plane() {
        let t = pointer_target(Vec2::new(0.5, -1.0), Vec2::new(2.0, 1.0));
        assert_eq!(t, Vec3::new(1.0, -1.0, 0.0));
    }

    fn pointer_app() -> (App, Entity, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<PointerState>();
        let window = app
            .world_mut()
            .spawn((
                Window {
                    resolution: WindowResolution::new(800.0, 400.0),
                    ..default()
                },
                PrimaryWindow,
            ))
            .id();
        app.world_mut().spawn((
            SceneCamera,
            Transform::from_xyz(0.0, 0.0, 5.0),
            Projection::Perspective(PerspectiveProjection {
                fov: 25f32.to_radians(),
                ..default()
            }),
        ));
        let body = app.world_mut().spawn((PointerBody, Transform::default())).id();
        (app, window, body)
    }

    #[test]
    fn body_follows_cursor_every_frame() {
        let (mut app, window, body) = pointer_app();
        // Bevy reports no cursor on the far edge, so stay on in-bounds pixels.
        for cursor in [Vec2::new(600.0, 100.0), Vec2::new(0.0, 399.0), Vec2::new(400.0, 200.0)] {
            app.world_mut()
                .get_mut::<Window>(window)
                .unwrap()
                .set_cursor_position(Some(cursor));
            app.world_mut().run_system_once(sample_pointer).unwrap();
            app.world_mut().run_system_once(drive_pointer_body).unwrap();

            let ndc = cursor_to_ndc(cursor, Vec2::new(800.0, 400.0));
            let he = viewport_half_extents(25f32.to_radians(), 5.0, 2.0);
            let pos = app.world().get::<Transform>(body).unwrap().translation;
            assert!((pos - pointer_target(ndc, he)).length() < 1e-5);
        }
    }

    #[test]
    fn cursor_leaving_keeps_last_position() {
        let (mut app, window, body) = pointer_app();
        let corner = Vec2::new(799.0, 0.0);
        app.world_mut()
            .get_mut::<Window>(window)
            .unwrap()
            .set_cursor_position(Some(corner));
        app.world_mut().run_system_once(sample_pointer).unwrap();
        app.world_mut()
            .get_mut::<Window>(window)
            .unwrap()
            .set_cursor_position(None);
        app.world_mut().run_system_once(sample_pointer).unwrap();
        app.world_mut().run_system_once(drive_pointer_body).unwrap();

        let expected = cursor_to_ndc(corner, Vec2::new(800.0, 400.0));
        assert_eq!(app.world().resource::<PointerState>().ndc, expected);
        assert!(expected.x > 0.99 && expected.y == 1.0);
        let pos = app.world().get::<Transform>(body).unwrap().translation;
        assert!(pos.x > 0.0 && pos.y > 0.0 && pos.z == 0.0);
    }
}
