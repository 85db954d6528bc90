//! Level editor action definitions
//!
//! Each command maps 1:1 onto a session operation (see `EditorSession::execute`).

use macroquad::prelude::KeyCode;
use crate::ui::{Action, ActionContext, ActionRegistry, Shortcut};

/// Action ids
pub mod ids {
    pub const NEW_LEVEL: &str = "level.new";
    pub const OPEN_LEVEL: &str = "level.open";
    pub const SAVE_LEVEL: &str = "level.save";
    pub const SHOW_PALETTE: &str = "palette.toggle";
    pub const REFRESH_CATALOG: &str = "catalog.refresh";
    pub const ADD_LAYER: &str = "layer.add";
    pub const REMOVE_LAYER: &str = "layer.remove";
    pub const LAYER_DEPTH_UP: &str = "layer.depth_up";
    pub const LAYER_DEPTH_DOWN: &str = "layer.depth_down";
    pub const NEXT_LAYER: &str = "layer.next";
    pub const PREV_LAYER: &str = "layer.prev";
    pub const MODE_VIEW: &str = "mode.view";
    pub const MODE_PAINT: &str = "mode.paint";
    pub const MODE_ERASE: &str = "mode.erase";
    pub const TOGGLE_PLAY: &str = "scene.play";
    pub const TILE_GROW: &str = "grid.tile_grow";
    pub const TILE_SHRINK: &str = "grid.tile_shrink";
    pub const ADD_COLUMN: &str = "grid.add_column";
    pub const REMOVE_COLUMN: &str = "grid.remove_column";
    pub const ADD_ROW: &str = "grid.add_row";
    pub const REMOVE_ROW: &str = "grid.remove_row";
}

fn editing(ctx: &ActionContext) -> bool {
    !ctx.playing
}

fn has_layers(ctx: &ActionContext) -> bool {
    !ctx.playing && ctx.layer_count > 0
}

/// Build the registry of every level editor command
pub fn create_editor_actions() -> ActionRegistry {
    let mut registry = ActionRegistry::new();

    // Level
    registry.register(
        Action::new(ids::NEW_LEVEL)
            .label("New")
            .shortcut(Shortcut::ctrl(KeyCode::N))
            .status_tip("Clear the level and start from the default grid")
            .category("Level")
            .enabled_when(editing),
    );
    registry.register(
        Action::new(ids::OPEN_LEVEL)
            .label("Open")
            .shortcut(Shortcut::ctrl(KeyCode::O))
            .status_tip("Open a level file")
            .category("Level")
            .enabled_when(editing),
    );
    registry.register(
        Action::new(ids::SAVE_LEVEL)
            .label("Save")
            .shortcut(Shortcut::ctrl(KeyCode::S))
            .status_tip("Save the level")
            .category("Level")
            .enabled_when(editing),
    );

    // Catalog
    registry.register(
        Action::new(ids::SHOW_PALETTE)
            .label("Palette")
            .shortcut(Shortcut::key(KeyCode::Tab))
            .status_tip("Show or hide the palette")
            .category("Catalog")
            .checked_when(|ctx| ctx.palette_open),
    );
    registry.register(
        Action::new(ids::REFRESH_CATALOG)
            .label("Refresh")
            .shortcut(Shortcut::key(KeyCode::F5))
            .status_tip("Rescan the content folders")
            .category("Catalog"),
    );

    // Layers
    registry.register(
        Action::new(ids::ADD_LAYER)
            .label("+ Layer")
            .shortcut(Shortcut::ctrl(KeyCode::L))
            .status_tip("Append an empty layer")
            .category("Layer")
            .enabled_when(editing),
    );
    registry.register(
        Action::new(ids::REMOVE_LAYER)
            .label("- Layer")
            .shortcut(Shortcut::ctrl_shift(KeyCode::L))
            .status_tip("Remove the selected layer and everything on it")
            .category("Layer")
            .enabled_when(has_layers),
    );
    registry.register(
        Action::new(ids::LAYER_DEPTH_UP)
            .label("Depth +")
            .shortcut(Shortcut::key(KeyCode::Equal))
            .status_tip("Move the selected layer one step forward")
            .category("Layer")
            .enabled_when(has_layers),
    );
    registry.register(
        Action::new(ids::LAYER_DEPTH_DOWN)
            .label("Depth -")
            .shortcut(Shortcut::key(KeyCode::Minus))
            .status_tip("Move the selected layer one step back")
            .category("Layer")
            .enabled_when(has_layers),
    );
    registry.register(
        Action::new(ids::NEXT_LAYER)
            .label("Next Layer")
            .shortcut(Shortcut::key(KeyCode::RightBracket))
            .category("Navigate")
            .enabled_when(has_layers),
    );
    registry.register(
        Action::new(ids::PREV_LAYER)
            .label("Previous Layer")
            .shortcut(Shortcut::key(KeyCode::LeftBracket))
            .category("Navigate")
            .enabled_when(has_layers),
    );

    // Modes
    registry.register(
        Action::new(ids::MODE_VIEW)
            .label("View")
            .shortcut(Shortcut::key(KeyCode::V))
            .status_tip("Look around without editing")
            .category("Mode")
            .checked_when(|ctx| ctx.mode == "View"),
    );
    registry.register(
        Action::new(ids::MODE_PAINT)
            .label("Paint")
            .shortcut(Shortcut::key(KeyCode::B))
            .status_tip("Paint the selected palette item")
            .category("Mode")
            .enabled_when(editing)
            .checked_when(|ctx| ctx.mode == "Paint"),
    );
    registry.register(
        Action::new(ids::MODE_ERASE)
            .label("Erase")
            .shortcut(Shortcut::key(KeyCode::E))
            .status_tip("Erase cells on the selected layer")
            .category("Mode")
            .enabled_when(editing)
            .checked_when(|ctx| ctx.mode == "Erase"),
    );

    // Grid
    registry.register(
        Action::new(ids::TILE_GROW)
            .label("Tile +")
            .shortcut(Shortcut::ctrl(KeyCode::Equal))
            .status_tip("Grow the tile size; placed items move with their cells")
            .category("Grid")
            .enabled_when(editing),
    );
    registry.register(
        Action::new(ids::TILE_SHRINK)
            .label("Tile -")
            .shortcut(Shortcut::ctrl(KeyCode::Minus))
            .status_tip("Shrink the tile size")
            .category("Grid")
            .enabled_when(editing),
    );
    registry.register(
        Action::new(ids::ADD_COLUMN)
            .label("Cols +")
            .shortcut(Shortcut::ctrl(KeyCode::Right))
            .status_tip("Add a column on the right")
            .category("Grid")
            .enabled_when(editing),
    );
    registry.register(
        Action::new(ids::REMOVE_COLUMN)
            .label("Cols -")
            .shortcut(Shortcut::ctrl(KeyCode::Left))
            .status_tip("Remove the rightmost column and everything in it")
            .category("Grid")
            .enabled_when(editing),
    );
    registry.register(
        Action::new(ids::ADD_ROW)
            .label("Rows +")
            .shortcut(Shortcut::ctrl(KeyCode::Up))
            .status_tip("Add a row at the top")
            .category("Grid")
            .enabled_when(editing),
    );
    registry.register(
        Action::new(ids::REMOVE_ROW)
            .label("Rows -")
            .shortcut(Shortcut::ctrl(KeyCode::Down))
            .status_tip("Remove the top row and everything in it")
            .category("Grid")
            .enabled_when(editing),
    );

    // Scene
    registry.register(
        Action::new(ids::TOGGLE_PLAY)
            .label("Play")
            .shortcut(Shortcut::key(KeyCode::F9))
            .status_tip("Try the level; edits made while playing are discarded")
            .category("Scene")
            .checked_when(|ctx| ctx.playing),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 21] = [
        ids::NEW_LEVEL,
        ids::OPEN_LEVEL,
        ids::SAVE_LEVEL,
        ids::SHOW_PALETTE,
        ids::REFRESH_CATALOG,
        ids::ADD_LAYER,
        ids::REMOVE_LAYER,
        ids::LAYER_DEPTH_UP,
        ids::LAYER_DEPTH_DOWN,
        ids::NEXT_LAYER,
        ids::PREV_LAYER,
        ids::MODE_VIEW,
        ids::MODE_PAINT,
        ids::MODE_ERASE,
        ids::TOGGLE_PLAY,
        ids::TILE_GROW,
        ids::TILE_SHRINK,
        ids::ADD_COLUMN,
        ids::REMOVE_COLUMN,
        ids::ADD_ROW,
        ids::REMOVE_ROW,
    ];

    #[test]
    fn test_every_command_registered_with_unique_shortcut() {
        let registry = create_editor_actions();
        assert_eq!(registry.len(), ALL.len());
        for id in ALL {
            let action = registry.get(id).unwrap();
            let shortcut = action.shortcut.as_ref().unwrap();
            assert_eq!(registry.find_by_shortcut(shortcut), Some(id));
        }
    }

    #[test]
    fn test_layer_commands_need_layers() {
        let registry = create_editor_actions();
        let none = ActionContext::default();
        assert!(!registry.is_enabled(ids::REMOVE_LAYER, &none));
        assert!(registry.is_enabled(ids::ADD_LAYER, &none));

        let two = ActionContext { layer_count: 2, ..Default::default() };
        assert!(registry.is_enabled(ids::LAYER_DEPTH_UP, &two));
    }

    #[test]
    fn test_play_mode_blocks_edits() {
        let registry = create_editor_actions();
        let ctx = ActionContext { layer_count: 2, playing: true, ..Default::default() };
        assert!(!registry.is_enabled(ids::MODE_PAINT, &ctx));
        assert!(!registry.is_enabled(ids::ADD_LAYER, &ctx));
        assert!(!registry.is_enabled(ids::TILE_GROW, &ctx));
        assert!(!registry.is_enabled(ids::REMOVE_ROW, &ctx));
        assert!(registry.is_enabled(ids::SHOW_PALETTE, &ctx));
        assert!(registry.is_enabled(ids::TOGGLE_PLAY, &ctx));
        assert!(registry.is_checked(ids::TOGGLE_PLAY, &ctx));
    }

    #[test]
    fn test_mode_checked_state() {
        let registry = create_editor_actions();
        let ctx = ActionContext { mode: "Erase", ..Default::default() };
        assert!(registry.is_checked(ids::MODE_ERASE, &ctx));
        assert!(!registry.is_checked(ids::MODE_PAINT, &ctx));
    }
}
