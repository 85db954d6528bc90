//! Strata: a layered tile level editor
//!
//! Paint templates from a folder-backed asset catalog onto a 2D grid with
//! any number of depth-ordered layers. Levels and catalog metadata are RON.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod math;
mod error;
mod world;
mod storage;
mod asset;
mod config;
mod editor;
mod ui;

use macroquad::prelude::*;
use asset::ContentPoller;
use config::EditorConfig;
use editor::{action_context, create_editor_actions, draw_editor, ids, EditorSession, SessionEvent};
use storage::Storage;
use ui::{MouseState, UiContext};
use world::SceneGraph;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Strata v{}", VERSION),
        window_width: 1600,
        window_height: 900,
        window_resizable: true,
        high_dpi: true,
        #[cfg(not(target_arch = "wasm32"))]
        fullscreen: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let config_path = EditorConfig::default_path();
    let (config, config_error) = EditorConfig::load_or_default(&config_path);

    // RUST_LOG wins over the config file
    let env = env_logger::Env::default().default_filter_or(config.log_filter.as_str());
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        println!("Failed to initialize logger: {}", e);
    }
    match config_error {
        Some(e) => log::warn!("Ignoring config {}: {}", config_path.display(), e),
        None => log::info!("Config: {}", config_path.display()),
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if !config_path.exists() {
            if let Err(e) = config.save(&config_path) {
                log::warn!("Could not write default config: {}", e);
            }
        }
    }

    let storage = Storage::new();
    let mut poller = ContentPoller::new(config.content_root.clone());
    let mut session = match EditorSession::new(config, storage, SceneGraph::new()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to start editor: {}", e);
            return;
        }
    };
    if let Err(e) = poller.poll(session.storage()) {
        log::debug!("Content poll failed: {}", e);
    }
    let registry = create_editor_actions();
    let mut ui_ctx = UiContext::new();

    log::info!("=== Strata v{} ===", VERSION);

    loop {
        let dt = get_frame_time();
        ui_ctx.begin_frame(MouseState::capture(&ui_ctx.mouse));

        // Shortcuts are read before drawing so the frame reflects them
        let mut triggered = registry.process_triggers(&action_context(&session));
        triggered.extend(draw_editor(&mut ui_ctx, &mut session, &registry));
        for id in triggered {
            run_action(&mut session, id);
        }

        for event in poller.update(session.storage(), dt) {
            let event = match event {
                asset::AssetEvent::Created(path) => SessionEvent::AssetCreated(path),
                asset::AssetEvent::Deleted(path) => SessionEvent::AssetDeleted(path),
            };
            let _ = session.handle(event);
        }

        for event in session.tick(dt) {
            log::debug!("{:?}", event);
        }

        next_frame().await;
    }
}

/// Run a toolbar or shortcut command. File commands go through a native
/// dialog when one is available. Failures are already logged by the session.
fn run_action(session: &mut EditorSession<SceneGraph>, id: &str) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if id == ids::OPEN_LEVEL {
            if let Some(path) = pick_level_file(session, false) {
                let _ = session.handle(SessionEvent::SceneOpened(path));
            }
            return;
        }
        if id == ids::SAVE_LEVEL && session.level_path().is_none() {
            if let Some(path) = pick_level_file(session, true) {
                let _ = session.handle(SessionEvent::SceneSaved(path));
            }
            return;
        }
    }
    let _ = session.execute(id);
}

#[cfg(not(target_arch = "wasm32"))]
fn pick_level_file(session: &EditorSession<SceneGraph>, save: bool) -> Option<String> {
    let default_dir = session
        .storage()
        .resolve(&session.config.levels_dir)
        .unwrap_or_else(|_| std::path::PathBuf::from("."));
    let _ = std::fs::create_dir_all(&default_dir);

    let dialog = rfd::FileDialog::new()
        .add_filter("RON Level", &["ron"])
        .set_directory(&default_dir);

    let path = if save {
        dialog.set_file_name(editor::UNTITLED_LEVEL).save_file()
    } else {
        dialog.pick_file()
    };
    path.map(|p| p.to_string_lossy().into_owned())
}
