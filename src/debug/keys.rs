use bevy::prelude::*;

use super::modes::{DebugRenderMode, DebugState};

/// `Digit1..Digit3` select a mode directly, `F1` cycles.
pub fn debug_key_input_system(keys: Option<Res<ButtonInput<KeyCode>>>, mut state: ResMut<DebugState>) {
    let Some(keys) = keys else {
        return;
    };
    let mut new_mode = None;
    if keys.just_pressed(KeyCode::Digit1) {
        new_mode = Some(DebugRenderMode::Surface);
    }
    if keys.just_pressed(KeyCode::Digit2) {
        new_mode = Some(DebugRenderMode::RapierWireframe);
    }
    if keys.just_pressed(KeyCode::Digit3) {
        new_mode = Some(DebugRenderMode::Markers);
    }
    if keys.just_pressed(KeyCode::F1) {
        new_mode = Some(state.mode.next());
    }
    if let Some(m) = new_mode {
        if m != state.mode {
            state.last_mode = state.mode;
            state.mode = m;
            info!(
                target: "debug",
                "MODE_CHANGE from={:?} to={:?} frame={}",
                state.last_mode, state.mode, state.frame_counter
            );
        }
    }
}
