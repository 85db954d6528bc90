//! Editor session
//!
//! One `EditorSession` exists per open editor. It owns the level, the asset
//! catalog, the palette, the controller and the scene host, and it is passed
//! by reference to the UI each frame. There is no global state.

use thiserror::Error;

use crate::asset::{AssetCatalog, AssetEvent, CategoryError};
use crate::config::EditorConfig;
use crate::error::EditError;
use crate::math::Vec3;
use crate::storage::Storage;
use crate::ui::TextInputState;
use crate::world::{load_snapshot_with_storage, save_snapshot_with_storage, Level, LevelSnapshot, SceneHost, SnapshotError};
use super::actions::ids;
use super::controller::{CellEdit, Controller, EditMode};
use super::events::{EditorEvent, EventQueue};
use super::palette::Palette;

/// How long status bar messages stay up
const STATUS_SECONDS: f32 = 3.0;

/// File name used when saving a level that was never opened from disk
pub const UNTITLED_LEVEL: &str = "untitled.ron";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Edit(#[from] EditError),
    #[error("level file: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("catalog: {0}")]
    Catalog(#[from] CategoryError),
    #[error("config: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("level is locked while playing")]
    Playing,
}

/// Host and input notifications the session reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    AssetCreated(String),
    AssetDeleted(String),
    SceneOpened(String),
    SceneSaved(String),
    EnterPlayMode,
    ExitPlayMode,
    PointerDown(Vec3),
    PointerDrag(Vec3),
    PointerUp,
    /// The host moved the level's anchor
    GridMoved(Vec3),
}

pub struct EditorSession<H: SceneHost> {
    pub config: EditorConfig,
    storage: Storage,
    pub level: Level,
    pub catalog: AssetCatalog,
    pub palette: Palette,
    pub controller: Controller,
    pub events: EventQueue<EditorEvent>,
    pub host: H,
    /// Name for the next Add Layer; blank picks "Layer N"
    pub layer_name: TextInputState,
    level_path: Option<String>,
    /// Level as it was when play mode started
    play_stash: Option<LevelSnapshot>,
    dirty: bool,
    status: Option<(String, f32)>,
}

impl<H: SceneHost> EditorSession<H> {
    /// Start a session: empty default level, catalog scanned from disk
    pub fn new(config: EditorConfig, storage: Storage, host: H) -> Result<Self, SessionError> {
        config.validate()?;
        let level = Level::new(config.grid()?, &config.default_layers)?;
        let catalog = AssetCatalog::new(storage.clone(), config.content_root.clone(), config.metadata_dir.clone())
            .with_capacity(config.queue_capacity);

        let mut session = Self {
            controller: Controller::new(config.depth_step),
            config,
            storage,
            level,
            catalog,
            palette: Palette::new(),
            events: EventQueue::new(),
            host,
            layer_name: TextInputState::default(),
            level_path: None,
            play_stash: None,
            dirty: false,
            status: None,
        };
        session.refresh_catalog()?;
        log::info!(
            "Editor session started ({} categories)",
            session.catalog.store().len()
        );
        Ok(session)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn level_path(&self) -> Option<&str> {
        self.level_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_playing(&self) -> bool {
        self.play_stash.is_some()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), STATUS_SECONDS));
    }

    /// Once per frame: apply queued asset notifications, re-sync the palette,
    /// age the status line, and hand back everything emitted since last tick.
    pub fn tick(&mut self, dt: f32) -> Vec<EditorEvent> {
        if let Some(change) = self.catalog.drain() {
            self.events.send(EditorEvent::CatalogChanged { revision: change.revision });
        }
        self.palette.sync(&self.catalog);

        if let Some((_, remaining)) = &mut self.status {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.status = None;
            }
        }
        self.events.drain().collect()
    }

    /// Dispatch a host notification. Declined edits are logged and shown in
    /// the status line, then returned to the caller.
    pub fn handle(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        let result = match event {
            SessionEvent::AssetCreated(path) => {
                self.catalog.notify(AssetEvent::Created(path));
                Ok(())
            }
            SessionEvent::AssetDeleted(path) => {
                self.catalog.notify(AssetEvent::Deleted(path));
                Ok(())
            }
            SessionEvent::SceneOpened(path) => self.open_level(&path),
            SessionEvent::SceneSaved(path) => self.save_level(&path),
            SessionEvent::EnterPlayMode => {
                self.enter_play_mode();
                Ok(())
            }
            SessionEvent::ExitPlayMode => self.exit_play_mode(),
            SessionEvent::PointerDown(point) => self.pointer(point, true),
            SessionEvent::PointerDrag(point) => self.pointer(point, false),
            SessionEvent::PointerUp => {
                self.controller.pointer_up();
                Ok(())
            }
            SessionEvent::GridMoved(origin) => self.move_grid(origin),
        };
        if let Err(e) = &result {
            self.decline(e);
        }
        result
    }

    /// Run a registered command by id
    pub fn execute(&mut self, action: &str) -> Result<(), SessionError> {
        let result = self.run_action(action);
        if let Err(e) = &result {
            self.decline(e);
        }
        result
    }

    fn run_action(&mut self, action: &str) -> Result<(), SessionError> {
        match action {
            ids::NEW_LEVEL => self.new_level(),
            ids::OPEN_LEVEL => match self.level_path.clone() {
                Some(path) => self.open_level(&path),
                None => {
                    self.set_status("No level file to reopen");
                    Ok(())
                }
            },
            ids::SAVE_LEVEL => {
                let path = self.level_path.clone().unwrap_or_else(|| self.default_level_path());
                self.save_level(&path)
            }
            ids::SHOW_PALETTE => {
                self.palette.toggle();
                Ok(())
            }
            ids::REFRESH_CATALOG => self.refresh_catalog(),
            ids::ADD_LAYER => {
                self.ensure_editable()?;
                let index = self.controller.add_layer(&mut self.level, Some(self.layer_name.text.as_str()))?;
                self.layer_name.take();
                self.controller.select_layer(index, &self.level)?;
                let name = self.level.layer(index)?.name.clone();
                self.set_status(format!("Added layer '{}'", name));
                self.level_changed();
                Ok(())
            }
            ids::REMOVE_LAYER => {
                self.ensure_editable()?;
                let removed = self.controller.remove_selected_layer(&mut self.level, &mut self.host)?;
                self.set_status(format!("Removed layer '{}'", removed.name));
                self.level_changed();
                Ok(())
            }
            ids::LAYER_DEPTH_UP | ids::LAYER_DEPTH_DOWN => {
                self.ensure_editable()?;
                let up = action == ids::LAYER_DEPTH_UP;
                let depth = self.controller.shift_selected_depth(up, &mut self.level, &mut self.host)?;
                self.set_status(format!("Layer depth {:.2}", depth));
                self.level_changed();
                Ok(())
            }
            ids::NEXT_LAYER | ids::PREV_LAYER => {
                self.controller.cycle_layer(action == ids::NEXT_LAYER, &self.level);
                Ok(())
            }
            ids::MODE_VIEW => {
                self.controller.mode = EditMode::View;
                Ok(())
            }
            ids::MODE_PAINT => {
                self.ensure_editable()?;
                self.controller.mode = EditMode::Paint;
                Ok(())
            }
            ids::MODE_ERASE => {
                self.ensure_editable()?;
                self.controller.mode = EditMode::Erase;
                Ok(())
            }
            ids::TILE_GROW | ids::TILE_SHRINK => {
                let step = if action == ids::TILE_GROW { self.config.tile_step } else { -self.config.tile_step };
                self.resize_tile(self.level.grid().tile_size + step)
            }
            ids::ADD_COLUMN | ids::REMOVE_COLUMN | ids::ADD_ROW | ids::REMOVE_ROW => {
                let grid = *self.level.grid();
                let (columns, rows) = match action {
                    ids::ADD_COLUMN => (grid.columns + 1, grid.rows),
                    ids::REMOVE_COLUMN => (grid.columns.saturating_sub(1), grid.rows),
                    ids::ADD_ROW => (grid.columns, grid.rows + 1),
                    _ => (grid.columns, grid.rows.saturating_sub(1)),
                };
                self.resize_grid(columns, rows).map(|_| ())
            }
            ids::TOGGLE_PLAY => {
                if self.is_playing() {
                    self.exit_play_mode()
                } else {
                    self.enter_play_mode();
                    Ok(())
                }
            }
            other => Err(SessionError::UnknownAction(other.to_string())),
        }
    }

    fn decline(&mut self, error: &SessionError) {
        log::warn!("Declined: {}", error);
        self.set_status(error.to_string());
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.is_playing() {
            return Err(SessionError::Playing);
        }
        Ok(())
    }

    fn level_changed(&mut self) {
        self.dirty = true;
        if !self.events.iter().any(|e| *e == EditorEvent::LevelChanged) {
            self.events.send(EditorEvent::LevelChanged);
        }
    }

    fn pointer(&mut self, point: Vec3, down: bool) -> Result<(), SessionError> {
        self.controller.pointer_move(point, &self.level);
        if self.is_playing() {
            return Ok(());
        }
        let selection = self.palette.selection();
        let edit = if down {
            self.controller
                .pointer_down(point, &mut self.level, &self.catalog, selection, &mut self.host)?
        } else {
            self.controller
                .pointer_drag(point, &mut self.level, &self.catalog, selection, &mut self.host)?
        };
        match edit {
            Some(CellEdit::Placed { col, row, template, .. }) => {
                log::debug!("Painted {} at ({}, {})", template, col, row);
                self.level_changed();
            }
            Some(CellEdit::Erased { col, row }) => {
                log::debug!("Erased ({}, {})", col, row);
                self.level_changed();
            }
            None => {}
        }
        Ok(())
    }

    fn default_level_path(&self) -> String {
        format!("{}/{}", self.config.levels_dir.trim_end_matches('/'), UNTITLED_LEVEL)
    }

    /// Destroy everything and start from the configured default level
    pub fn new_level(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        let fresh = Level::new(self.config.grid()?, &self.config.default_layers)?;
        let destroyed = self.level.clear(&mut self.host);
        self.level = fresh;
        self.controller.clamp_layer(&self.level);
        self.level_path = None;
        self.level_changed();
        self.dirty = false;
        log::info!("New level ({} instances destroyed)", destroyed);
        Ok(())
    }

    /// Load a level file. A missing file starts a fresh level bound to that path.
    pub fn open_level(&mut self, path: &str) -> Result<(), SessionError> {
        self.ensure_editable()?;
        if !self.storage.exists(path) {
            self.new_level()?;
            self.level_path = Some(path.to_string());
            log::info!("{} does not exist yet, starting a new level", path);
            return Ok(());
        }

        let snapshot = load_snapshot_with_storage(path, &self.storage)?;
        self.level.clear(&mut self.host);
        self.level = Level::from_snapshot(&snapshot, &mut self.host)?;
        self.controller.clamp_layer(&self.level);
        self.level_path = Some(path.to_string());
        self.dirty = false;
        self.events.send(EditorEvent::LevelChanged);
        log::info!("Opened {} ({} instances)", path, self.level.occupied_count());
        self.set_status(format!("Opened {}", path));
        Ok(())
    }

    /// Write the level to a file and remember the path
    pub fn save_level(&mut self, path: &str) -> Result<(), SessionError> {
        save_snapshot_with_storage(&self.level.snapshot(), path, &self.storage)?;
        self.level_path = Some(path.to_string());
        self.dirty = false;
        log::info!("Saved {}", path);
        self.set_status(format!("Saved {}", path));
        Ok(())
    }

    /// Change the tile size; placed items follow their cells
    pub fn resize_tile(&mut self, tile_size: f32) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.level.resize_tile(tile_size, &mut self.host)?;
        log::info!("Tile size {}", tile_size);
        self.set_status(format!("Tile size {:.2}", tile_size));
        self.level_changed();
        Ok(())
    }

    /// Change the cell count. Returns how many placed items fell outside the
    /// new extent and were destroyed.
    pub fn resize_grid(&mut self, columns: usize, rows: usize) -> Result<usize, SessionError> {
        self.ensure_editable()?;
        let destroyed = self.level.resize_grid(columns, rows, &mut self.host)?;
        self.controller.pointer_up();
        self.controller.hover = None;
        log::info!("Grid resized to {}x{} ({} instances destroyed)", columns, rows, destroyed);
        if destroyed > 0 {
            self.set_status(format!("Grid {}x{}, removed {} item(s)", columns, rows, destroyed));
        } else {
            self.set_status(format!("Grid {}x{}", columns, rows));
        }
        self.level_changed();
        Ok(destroyed)
    }

    /// Move the grid anchor, carrying every placed item along
    pub fn move_grid(&mut self, origin: Vec3) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.level.set_origin(origin, &mut self.host)?;
        self.level_changed();
        Ok(())
    }

    /// Rescan content folders now
    pub fn refresh_catalog(&mut self) -> Result<(), SessionError> {
        let change = self.catalog.refresh()?;
        self.palette.sync(&self.catalog);
        self.events.send(EditorEvent::CatalogChanged { revision: change.revision });
        Ok(())
    }

    /// Stash the level so play mode can't leave lasting changes
    pub fn enter_play_mode(&mut self) {
        if self.is_playing() {
            return;
        }
        self.controller.pointer_up();
        self.play_stash = Some(self.level.snapshot());
        log::info!("Entered play mode");
    }

    /// Put the stashed level back
    pub fn exit_play_mode(&mut self) -> Result<(), SessionError> {
        let Some(stash) = self.play_stash.take() else {
            return Ok(());
        };
        self.level.restore(&stash, &mut self.host)?;
        self.controller.clamp_layer(&self.level);
        self.events.send(EditorEvent::LevelChanged);
        log::info!("Exited play mode");
        Ok(())
    }
}
