//! Basic UI widgets

use macroquad::prelude::*;
use super::{Rect, UiContext, ACCENT_COLOR, BUTTON_HOVER, BUTTON_PRESSED, FONT_SIZE_CONTENT, HEADER_COLOR, TEXT_COLOR, TEXT_DIM};

/// Left-to-right toolbar layout helper
pub struct Toolbar {
    rect: Rect,
    cursor_x: f32,
    spacing: f32,
}

impl Toolbar {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cursor_x: rect.x + 4.0,
            spacing: 4.0,
        }
    }

    pub fn separator(&mut self) {
        self.cursor_x += self.spacing * 2.0;
        draw_line(
            self.cursor_x,
            self.rect.y + 4.0,
            self.cursor_x,
            self.rect.bottom() - 4.0,
            1.0,
            Color::from_rgba(80, 80, 80, 255),
        );
        self.cursor_x += self.spacing * 2.0;
    }

    /// Text button sized to its label
    pub fn button(&mut self, ctx: &mut UiContext, label: &str, tooltip: &str, active: bool, enabled: bool) -> bool {
        let dims = measure_text(label, None, FONT_SIZE_CONTENT as u16, 1.0);
        let rect = Rect::new(
            self.cursor_x.round(),
            (self.rect.y + 2.0).round(),
            (dims.width + 12.0).round(),
            (self.rect.h - 4.0).round(),
        );
        self.cursor_x += rect.w + self.spacing;
        text_button(ctx, rect, label, tooltip, active, enabled)
    }
}

/// Draw a text button, returns true if clicked
pub fn text_button(ctx: &mut UiContext, rect: Rect, label: &str, tooltip: &str, active: bool, enabled: bool) -> bool {
    let hovered = enabled && ctx.mouse.inside(&rect);
    let pressed = hovered && ctx.mouse.left_down;

    if hovered && !tooltip.is_empty() {
        ctx.set_tooltip(tooltip, ctx.mouse.x, ctx.mouse.y);
    }

    let bg = if active {
        ACCENT_COLOR
    } else if pressed {
        BUTTON_PRESSED
    } else if hovered {
        BUTTON_HOVER
    } else {
        HEADER_COLOR
    };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg);

    let color = if !enabled {
        TEXT_DIM
    } else if active {
        WHITE
    } else {
        TEXT_COLOR
    };
    draw_label(label, rect, color);

    hovered && ctx.mouse.left_pressed
}

/// Selectable list row (layers, palette entries); returns true if clicked
pub fn list_row(ctx: &mut UiContext, rect: Rect, text: &str, selected: bool) -> bool {
    let hovered = ctx.mouse.inside(&rect);
    if selected {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, Color::new(ACCENT_COLOR.r, ACCENT_COLOR.g, ACCENT_COLOR.b, 0.35));
    } else if hovered {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, BUTTON_HOVER);
    }
    let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
    let y = (rect.y + (rect.h + dims.height) * 0.5).round();
    draw_text(text, (rect.x + 6.0).round(), y, FONT_SIZE_CONTENT, if selected { WHITE } else { TEXT_COLOR });
    hovered && ctx.mouse.left_pressed
}

/// Centered label
pub fn draw_label(text: &str, rect: Rect, color: Color) {
    let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
    draw_text(
        text,
        (rect.x + (rect.w - dims.width) * 0.5).round(),
        (rect.y + (rect.h + dims.height) * 0.5).round(),
        FONT_SIZE_CONTENT,
        color,
    );
}

/// Draw the frame's pending tooltip (call last)
pub fn draw_tooltip(ctx: &mut UiContext) {
    let Some((text, x, y)) = ctx.take_tooltip() else {
        return;
    };
    let dims = measure_text(&text, None, FONT_SIZE_CONTENT as u16, 1.0);
    let w = dims.width + 10.0;
    let h = dims.height + 10.0;
    let tx = (x + 12.0).min(screen_width() - w);
    let ty = (y + 16.0).min(screen_height() - h);
    draw_rectangle(tx, ty, w, h, Color::from_rgba(45, 45, 50, 240));
    draw_rectangle_lines(tx, ty, w, h, 1.0, Color::from_rgba(80, 80, 80, 255));
    draw_text(&text, tx + 5.0, ty + 5.0 + dims.height, FONT_SIZE_CONTENT, TEXT_COLOR);
}
