//! Input state for UI interaction

use super::Rect;

/// Mouse button state
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
    pub moved: bool,
}

impl MouseState {
    /// Read the current mouse from macroquad
    pub fn capture(previous: &MouseState) -> Self {
        use macroquad::prelude::{is_mouse_button_down, is_mouse_button_pressed, is_mouse_button_released, mouse_position, MouseButton};
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            left_released: is_mouse_button_released(MouseButton::Left),
            moved: x != previous.x || y != previous.y,
        }
    }

    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    /// Held down inside a rect
    pub fn clicking(&self, rect: &Rect) -> bool {
        self.left_down && rect.contains(self.x, self.y)
    }

    /// Just clicked inside a rect
    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_pressed && rect.contains(self.x, self.y)
    }
}

/// UI context passed through the frame
#[derive(Debug, Default)]
pub struct UiContext {
    pub mouse: MouseState,
    /// Widget that captured the pointer on press (grid strokes)
    pub capture: Option<u64>,
    tooltip: Option<(String, f32, f32)>,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.tooltip = None;
        if !self.mouse.left_down {
            self.capture = None;
        }
    }

    pub fn is_captured_by(&self, id: u64) -> bool {
        self.capture == Some(id)
    }

    pub fn set_tooltip(&mut self, text: &str, x: f32, y: f32) {
        self.tooltip = Some((text.to_string(), x, y));
    }

    pub fn take_tooltip(&mut self) -> Option<(String, f32, f32)> {
        self.tooltip.take()
    }
}
