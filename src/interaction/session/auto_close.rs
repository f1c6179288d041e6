use crate::core::config::SceneConfig;
use bevy::prelude::*;

#[derive(Resource, Deref, DerefMut)]
pub struct AutoCloseTimer(Timer);

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_autoclose)
            .add_systems(Update, check_autoclose);
    }
}

fn setup_autoclose(mut commands: Commands, cfg: Res<SceneConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(target: "scene", seconds = secs, "AutoClose: will exit after {secs} seconds");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn check_autoclose(
    time: Res<Time>,
    mut timer: Option<ResMut<AutoCloseTimer>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if let Some(t) = timer.as_mut() {
        t.tick(time.delta());
        if t.just_finished() {
            info!(target: "scene", "AutoClose: timer finished, requesting app exit");
            ev_exit.write(AppExit::Success);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn zero_means_no_timer() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SceneConfig::default());
        app.world_mut().run_system_once(setup_autoclose).unwrap();
        assert!(app.world().get_resource::<AutoCloseTimer>().is_none());
    }

    #[test]
    fn positive_value_arms_timer() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        let mut cfg = SceneConfig::default();
        cfg.window.auto_close = 2.5;
        app.insert_resource(cfg);
        app.world_mut().run_system_once(setup_autoclose).unwrap();
        let timer = app.world().resource::<AutoCloseTimer>();
        assert_eq!(timer.duration().as_secs_f32(), 2.5);
    }
}
