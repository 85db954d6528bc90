//! UI Theme - Shared colors and styling constants

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 1.0);

/// Header/toolbar background
pub const HEADER_COLOR: Color = Color::new(0.15, 0.15, 0.18, 1.0);

pub const PANEL_COLOR: Color = Color::new(0.13, 0.13, 0.15, 1.0);

pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

/// Accent (selected layer, armed palette item, active mode)
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

pub const BUTTON_HOVER: Color = Color::new(0.235, 0.235, 0.275, 1.0);

pub const BUTTON_PRESSED: Color = Color::new(0.235, 0.314, 0.392, 1.0);

pub const WARNING_COLOR: Color = Color::new(0.95, 0.6, 0.3, 1.0);

// =============================================================================
// Font Sizes
// =============================================================================

pub const FONT_SIZE_HEADER: f32 = 14.0;

pub const FONT_SIZE_CONTENT: f32 = 12.0;

pub const FONT_SIZE_SMALL: f32 = 10.0;

// =============================================================================
// Grid view
// =============================================================================

pub const GRID_BG: Color = Color::new(0.08, 0.08, 0.1, 1.0);

pub const GRID_LINE: Color = Color::new(0.22, 0.22, 0.26, 1.0);

pub const HOVER_CELL: Color = Color::new(1.0, 1.0, 1.0, 0.12);

/// Occupants on layers other than the selected one are dimmed to this alpha
pub const INACTIVE_LAYER_ALPHA: f32 = 0.3;

const CATEGORY_COLORS: [Color; 6] = [
    Color::new(0.45, 0.7, 0.35, 1.0),
    Color::new(0.8, 0.4, 0.35, 1.0),
    Color::new(0.4, 0.55, 0.85, 1.0),
    Color::new(0.85, 0.75, 0.35, 1.0),
    Color::new(0.65, 0.45, 0.8, 1.0),
    Color::new(0.4, 0.75, 0.75, 1.0),
];

/// Stable tile color for a category name
pub fn category_color(category: &str) -> Color {
    let hash = category
        .bytes()
        .fold(5381u32, |h, b| h.wrapping_mul(33) ^ u32::from(b));
    CATEGORY_COLORS[hash as usize % CATEGORY_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_color_is_stable() {
        assert_eq!(category_color("Enemies"), category_color("Enemies"));
        let c = category_color("");
        assert_eq!(c.a, 1.0);
    }
}
