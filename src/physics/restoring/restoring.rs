//! Radial restoring impulse that pulls every metaball back toward the origin.
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::components::MetaBall;
use crate::core::config::SceneConfig;
use crate::core::system::system_order::PrePhysicsSet;

pub struct RestoringImpulsePlugin;

impl Plugin for RestoringImpulsePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_restoring_impulse.in_set(PrePhysicsSet));
    }
}

/// `normalize(p) * -scale * clamp(dt, 0, max_dt)`; zero at the origin.
pub fn restoring_impulse(position: Vec3, dt: f32, scale: f32, max_dt: f32) -> Vec3 {
    let dt = dt.clamp(0.0, max_dt.max(0.0));
    position.normalize_or_zero() * (-scale * dt)
}

pub fn apply_restoring_impulse(
    cfg: Res<SceneConfig>,
    time: Res<Time>,
    mut q: Query<(&Transform, &mut ExternalImpulse), With<MetaBall>>,
) {
    let dt = time.delta_secs();
    let scale = cfg.metaball.impulse_scale;
    let max_dt = cfg.metaball.max_delta;
    for (tf, mut ext) in &mut q {
        // Rapier clears the impulse after each step; overwrite, don't accumulate.
        ext.impulse = restoring_impulse(tf.translation, dt, scale, max_dt);
        ext.torque_impulse = Vec3::ZERO;
    }
}
