use bevy::prelude::*;
use glass_metaballs::{ConfigDiagnostics, SceneConfig, ScenePlugin};

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use glass_metaballs::interaction::session::config_hot_reload::{
    existing_layers, ConfigReloadSettings,
};
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(about = "Glass metaball fluid scene", version)]
struct Cli {
    /// Config layers merged in order (later files override earlier keys).
    /// Defaults to assets/config/scene.ron + scene.local.ron.
    #[arg(long = "config", value_name = "PATH")]
    config: Vec<PathBuf>,
    /// Exit after this many seconds (overrides window.autoClose).
    #[arg(long)]
    auto_close: Option<f32>,
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(cli: &Cli) -> (SceneConfig, ConfigDiagnostics, ConfigReloadSettings) {
    let settings = if cli.config.is_empty() {
        ConfigReloadSettings::default()
    } else {
        ConfigReloadSettings::for_layers(cli.config.clone())
    };
    // Explicit layers are all required; the default local layer is optional.
    let (mut cfg, used, errors) = if cli.config.is_empty() {
        SceneConfig::load_layered(existing_layers(&settings.paths))
    } else {
        SceneConfig::load_layered(settings.paths.iter())
    };
    if let Some(secs) = cli.auto_close {
        cfg.window.auto_close = secs;
    }
    let warnings = cfg.validate();
    (cfg, ConfigDiagnostics { used, errors, warnings }, settings)
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> (SceneConfig, ConfigDiagnostics) {
    // No filesystem on the web: embed the base layer.
    const RAW: &str = include_str!("../assets/config/scene.ron");
    let (cfg, errors) = match SceneConfig::from_ron_str(RAW) {
        Ok(cfg) => (cfg, Vec::new()),
        Err(e) => (SceneConfig::default(), vec![format!("embedded scene.ron: {e}")]),
    };
    let warnings = cfg.validate();
    let used = vec!["embedded:assets/config/scene.ron".to_string()];
    (cfg, ConfigDiagnostics { used, errors, warnings })
}

fn main() -> anyhow::Result<()> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    #[cfg(not(target_arch = "wasm32"))]
    let (cfg, diagnostics, reload) = load_config(&Cli::parse());
    #[cfg(target_arch = "wasm32")]
    let (cfg, diagnostics) = load_config();

    let mut app = App::new();
    #[cfg(not(target_arch = "wasm32"))]
    app.insert_resource(reload);
    app.insert_resource(cfg.clone())
        .insert_resource(diagnostics)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ScenePlugin);

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("app exited with error code {code}"),
    }
}
