//! Editor layout - toolbar, layers panel, grid view, palette, status bar

use macroquad::prelude::*;
use crate::math::Vec3;
use crate::ui::{
    category_color, draw_label, draw_text_input, draw_tooltip, list_row, ActionContext, ActionRegistry, Rect,
    TextInputResult, Toolbar, UiContext,
    ACCENT_COLOR, BG_COLOR, FONT_SIZE_CONTENT, FONT_SIZE_HEADER, FONT_SIZE_SMALL, GRID_BG, GRID_LINE, HEADER_COLOR,
    HOVER_CELL, INACTIVE_LAYER_ALPHA, PANEL_COLOR, TEXT_COLOR, TEXT_DIM, WARNING_COLOR,
};
use crate::world::{Grid, SceneHost};
use super::actions::ids;
use super::session::{EditorSession, SessionEvent};

const TOOLBAR_HEIGHT: f32 = 28.0;
const STATUS_HEIGHT: f32 = 22.0;
const LAYERS_WIDTH: f32 = 180.0;
const PALETTE_WIDTH: f32 = 220.0;
const ROW_HEIGHT: f32 = 20.0;
const TITLE_HEIGHT: f32 = 20.0;
const GRID_MARGIN: f32 = 16.0;

/// Pointer-capture id of the grid view
const GRID_VIEW_ID: u64 = 1;

/// Toolbar groups, left to right
const TOOLBAR_GROUPS: [&str; 6] = ["Level", "Catalog", "Layer", "Grid", "Mode", "Scene"];

/// Maps between grid world space and screen pixels. World +Y is up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridView {
    pub rect: Rect,
    /// Pixels per world unit
    pub scale: f32,
    /// Screen position of the grid's bottom-left corner
    origin_px: (f32, f32),
    grid_origin: Vec3,
}

impl GridView {
    /// Fit the whole grid into `rect`, centered
    pub fn fit(rect: Rect, grid: &Grid) -> Self {
        let avail_w = (rect.w - GRID_MARGIN * 2.0).max(1.0);
        let avail_h = (rect.h - GRID_MARGIN * 2.0).max(1.0);
        let scale = (avail_w / grid.width()).min(avail_h / grid.height()).max(0.01);
        let (w, h) = (grid.width() * scale, grid.height() * scale);
        Self {
            rect,
            scale,
            origin_px: (rect.x + (rect.w - w) * 0.5, rect.y + (rect.h + h) * 0.5),
            grid_origin: grid.origin,
        }
    }

    pub fn world_to_screen(&self, point: Vec3) -> (f32, f32) {
        (
            self.origin_px.0 + (point.x - self.grid_origin.x) * self.scale,
            self.origin_px.1 - (point.y - self.grid_origin.y) * self.scale,
        )
    }

    /// Screen point on the grid plane (z = 0)
    pub fn screen_to_world(&self, x: f32, y: f32) -> Vec3 {
        Vec3::new(
            self.grid_origin.x + (x - self.origin_px.0) / self.scale,
            self.grid_origin.y + (self.origin_px.1 - y) / self.scale,
            0.0,
        )
    }

    /// Screen rect of a cell
    pub fn cell_rect(&self, col: usize, row: usize, tile_size: f32) -> Rect {
        let size = tile_size * self.scale;
        Rect::new(
            self.origin_px.0 + col as f32 * size,
            self.origin_px.1 - (row as f32 + 1.0) * size,
            size,
            size,
        )
    }
}

/// Snapshot of session state for action enable/checked conditions
pub fn action_context<H: SceneHost>(session: &EditorSession<H>) -> ActionContext {
    ActionContext {
        mode: session.controller.mode.label(),
        has_selection: session.palette.selection().is_some(),
        layer_count: session.level.layer_count(),
        has_level_path: session.level_path().is_some(),
        is_dirty: session.is_dirty(),
        palette_open: session.palette.is_open(),
        playing: session.is_playing(),
        text_editing: session.layer_name.focused,
    }
}

/// Draw the complete editor UI. Returns ids of toolbar actions clicked.
pub fn draw_editor<H: SceneHost>(
    ctx: &mut UiContext,
    session: &mut EditorSession<H>,
    registry: &ActionRegistry,
) -> Vec<&'static str> {
    let screen = Rect::screen(screen_width(), screen_height());
    clear_background(BG_COLOR);

    let (toolbar_rect, rest) = screen.split_v_px(TOOLBAR_HEIGHT);
    let (main_rect, status_rect) = rest.split_v_px_bottom(STATUS_HEIGHT);
    let (layers_rect, rest) = main_rect.split_h_px(LAYERS_WIDTH);
    let (grid_rect, palette_rect) = if session.palette.is_open() {
        rest.split_h_px_right(PALETTE_WIDTH)
    } else {
        (rest, Rect::default())
    };

    let actx = action_context(session);
    let mut clicked = draw_toolbar(ctx, toolbar_rect, registry, &actx);
    clicked.extend(draw_layers_panel(ctx, layers_rect, session));
    draw_grid_view(ctx, grid_rect, session);
    if session.palette.is_open() {
        draw_palette(ctx, palette_rect, session);
    }
    draw_status_bar(status_rect, session);
    draw_tooltip(ctx);

    clicked
}

fn draw_toolbar(ctx: &mut UiContext, rect: Rect, registry: &ActionRegistry, actx: &ActionContext) -> Vec<&'static str> {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, HEADER_COLOR);
    let mut toolbar = Toolbar::new(rect);
    let mut clicked = Vec::new();

    for (i, group) in TOOLBAR_GROUPS.iter().enumerate() {
        if i > 0 {
            toolbar.separator();
        }
        for action in registry.actions_in_category(group) {
            let enabled = action.is_enabled(actx);
            if toolbar.button(ctx, action.label, &action.tooltip(), action.is_checked(actx), enabled) && enabled {
                clicked.push(action.id);
            }
        }
    }
    clicked
}

fn draw_panel_title(rect: Rect, title: &str) -> Rect {
    draw_rectangle(rect.x, rect.y, rect.w, TITLE_HEIGHT, HEADER_COLOR);
    draw_text(title, rect.x + 5.0, rect.y + 14.0, FONT_SIZE_HEADER, TEXT_COLOR);
    Rect::new(rect.x, rect.y + TITLE_HEIGHT, rect.w, (rect.h - TITLE_HEIGHT).max(0.0))
}

/// Layer list plus the name field for the next layer. Enter in the field
/// asks for Add Layer.
fn draw_layers_panel<H: SceneHost>(ctx: &mut UiContext, rect: Rect, session: &mut EditorSession<H>) -> Option<&'static str> {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, PANEL_COLOR);
    let content = draw_panel_title(rect, "Layers");
    let (content, name_rect) = content.split_v_px_bottom(ROW_HEIGHT + 8.0);
    let name_rect = Rect::new(name_rect.x + 4.0, name_rect.y + 4.0, (name_rect.w - 8.0).max(0.0), ROW_HEIGHT);
    let submitted = !session.is_playing()
        && draw_text_input(ctx, name_rect, &mut session.layer_name, "New layer name") == TextInputResult::Submitted;

    let selected = session.controller.selected_layer();
    let mut clicked = None;
    for (i, layer) in session.level.layers().iter().enumerate() {
        let count = session.level.layer_occupants(i).count();
        let text = format!("{}  z={:.1}  ({})", layer.name, layer.depth, count);
        if list_row(ctx, content.row(i, ROW_HEIGHT), &text, i == selected) {
            clicked = Some(i);
        }
    }
    if session.level.layer_count() == 0 {
        draw_text("No layers", content.x + 6.0, content.y + 14.0, FONT_SIZE_CONTENT, TEXT_DIM);
    }

    if let Some(index) = clicked {
        if let Err(e) = session.controller.select_layer(index, &session.level) {
            session.set_status(e.to_string());
        }
    }
    submitted.then_some(ids::ADD_LAYER)
}

fn draw_grid_view<H: SceneHost>(ctx: &mut UiContext, rect: Rect, session: &mut EditorSession<H>) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, GRID_BG);
    let grid = *session.level.grid();
    let view = GridView::fit(rect, &grid);
    let selected = session.controller.selected_layer();

    // Other layers first, dimmed, so the selected layer draws on top
    let mut occupants: Vec<_> = session.level.occupants().collect();
    occupants.sort_by_key(|p| p.layer == selected);
    for placed in occupants {
        let cell = view.cell_rect(placed.col, placed.row, grid.tile_size).pad(1.0);
        let mut color = category_color(&placed.occupant.category);
        if placed.layer != selected {
            color.a = INACTIVE_LAYER_ALPHA;
        }
        draw_rectangle(cell.x, cell.y, cell.w, cell.h, color);
        if placed.layer == selected && cell.w >= 14.0 {
            let initial: String = placed.occupant.template.chars().take(2).collect();
            draw_label(&initial, cell, BLACK);
        }
    }

    // Grid lines
    let (left, top) = view.world_to_screen(Vec3::new(grid.origin.x, grid.origin.y + grid.height(), 0.0));
    let (right, bottom) = view.world_to_screen(Vec3::new(grid.origin.x + grid.width(), grid.origin.y, 0.0));
    let step = grid.tile_size * view.scale;
    for c in 0..=grid.columns {
        let x = left + c as f32 * step;
        draw_line(x, top, x, bottom, 1.0, GRID_LINE);
    }
    for r in 0..=grid.rows {
        let y = bottom - r as f32 * step;
        draw_line(left, y, right, y, 1.0, GRID_LINE);
    }

    if let Some((col, row)) = session.controller.hover {
        if col >= 0 && row >= 0 {
            let cell = view.cell_rect(col as usize, row as usize, grid.tile_size);
            draw_rectangle(cell.x, cell.y, cell.w, cell.h, HOVER_CELL);
        }
    }

    // Pointer -> session
    let mouse = ctx.mouse;
    let world = view.screen_to_world(mouse.x, mouse.y);
    if mouse.left_pressed && mouse.inside(&rect) {
        ctx.capture = Some(GRID_VIEW_ID);
        let _ = session.handle(SessionEvent::PointerDown(world));
    } else if ctx.is_captured_by(GRID_VIEW_ID) && mouse.left_down && mouse.moved {
        let _ = session.handle(SessionEvent::PointerDrag(world));
    } else if mouse.left_released {
        let _ = session.handle(SessionEvent::PointerUp);
    } else if mouse.moved && mouse.inside(&rect) {
        session.controller.pointer_move(world, &session.level);
    }
}

fn draw_palette<H: SceneHost>(ctx: &mut UiContext, rect: Rect, session: &mut EditorSession<H>) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, PANEL_COLOR);
    let content = draw_panel_title(rect, "Palette");

    let categories: Vec<String> = session.palette.categories().map(String::from).collect();
    if categories.is_empty() {
        draw_text("Content folder is empty", content.x + 6.0, content.y + 14.0, FONT_SIZE_CONTENT, TEXT_DIM);
        return;
    }

    let active = session.palette.active_index();
    let mut clicked_category = None;
    for (i, name) in categories.iter().enumerate() {
        if list_row(ctx, content.row(i, ROW_HEIGHT), name, i == active) {
            clicked_category = Some(i);
        }
    }

    let entries_top = categories.len() as f32 * ROW_HEIGHT + 8.0;
    let (_, entries_rect) = content.split_v_px(entries_top);
    draw_line(entries_rect.x, entries_rect.y - 4.0, entries_rect.right(), entries_rect.y - 4.0, 1.0, GRID_LINE);

    let category = session.palette.active_category().unwrap_or_default().to_string();
    let mut clicked_entry = None;
    for (i, entry) in session.palette.entries().iter().enumerate() {
        let text = if entry.template_count > 1 {
            format!("{}  x{}", entry.name, entry.template_count)
        } else {
            entry.name.clone()
        };
        let row = entries_rect.row(i, ROW_HEIGHT);
        if list_row(ctx, row, &text, session.palette.is_selected(&category, &entry.name)) {
            clicked_entry = Some(i);
        }
        draw_rectangle(row.right() - 10.0, row.y + 6.0, 6.0, 8.0, category_color(&category));
    }

    if let Some(i) = clicked_category {
        session.palette.set_active_category(i);
    }
    if let Some(i) = clicked_entry {
        if let Err(e) = session.palette.select_entry(i, &mut session.events) {
            session.set_status(e.to_string());
        }
    }
}

fn draw_status_bar<H: SceneHost>(rect: Rect, session: &EditorSession<H>) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, HEADER_COLOR);
    let y = rect.y + 15.0;

    let layer = session
        .level
        .layer(session.controller.selected_layer())
        .map(|l| l.name.as_str())
        .unwrap_or("-");
    let hover = session
        .controller
        .hover
        .map(|(c, r)| format!("[{}, {}]", c, r))
        .unwrap_or_default();
    let file = session.level_path().unwrap_or("(unsaved)");
    let left = format!(
        "{}  |  {}  |  {} placed  |  {}{}",
        if session.is_playing() { "PLAYING" } else { session.controller.mode.label() },
        layer,
        session.level.occupied_count(),
        file,
        if session.is_dirty() { " *" } else { "" },
    );
    draw_text(&left, rect.x + 6.0, y, FONT_SIZE_SMALL + 2.0, TEXT_COLOR);

    if let Some(sel) = session.palette.selection() {
        let text = format!("{}/{}  {}", sel.category, sel.variant, hover);
        let dims = measure_text(&text, None, FONT_SIZE_CONTENT as u16, 1.0);
        draw_text(&text, rect.right() - dims.width - 8.0, y, FONT_SIZE_CONTENT, ACCENT_COLOR);
    } else if !hover.is_empty() {
        let dims = measure_text(&hover, None, FONT_SIZE_CONTENT as u16, 1.0);
        draw_text(&hover, rect.right() - dims.width - 8.0, y, FONT_SIZE_CONTENT, TEXT_DIM);
    }

    if let Some(status) = session.status() {
        let dims = measure_text(status, None, FONT_SIZE_CONTENT as u16, 1.0);
        draw_text(status, rect.x + (rect.w - dims.width) * 0.5, y, FONT_SIZE_CONTENT, WARNING_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_world_round_trip() {
        let grid = Grid::with_origin(20, 10, 1.0, Vec3::new(-5.0, 2.0, 0.0)).unwrap();
        let view = GridView::fit(Rect::new(100.0, 50.0, 800.0, 600.0), &grid);

        let p = Vec3::new(3.25, 7.5, 0.0);
        let (x, y) = view.world_to_screen(p);
        assert!(view.screen_to_world(x, y).approx_eq(p, 1e-3));
    }

    #[test]
    fn test_world_up_is_screen_up() {
        let grid = Grid::default();
        let view = GridView::fit(Rect::new(0.0, 0.0, 400.0, 400.0), &grid);
        let (_, low) = view.world_to_screen(Vec3::new(0.0, 0.0, 0.0));
        let (_, high) = view.world_to_screen(Vec3::new(0.0, 5.0, 0.0));
        assert!(high < low);
    }

    #[test]
    fn test_cell_rect_center_maps_to_cell() {
        let grid = Grid::default();
        let view = GridView::fit(Rect::new(0.0, 0.0, 640.0, 480.0), &grid);
        let cell = view.cell_rect(5, 3, grid.tile_size);
        let world = view.screen_to_world(cell.x + cell.w * 0.5, cell.y + cell.h * 0.5);
        assert_eq!(grid.world_to_cell(world), (5, 3));
    }

    #[test]
    fn test_fit_keeps_grid_inside_rect() {
        let grid = Grid::default();
        let rect = Rect::new(10.0, 10.0, 300.0, 300.0);
        let view = GridView::fit(rect, &grid);
        let (x0, y0) = view.world_to_screen(Vec3::new(0.0, 10.0, 0.0));
        let (x1, y1) = view.world_to_screen(Vec3::new(20.0, 0.0, 0.0));
        assert!(x0 >= rect.x && x1 <= rect.right());
        assert!(y0 >= rect.y && y1 <= rect.bottom());
    }
}
