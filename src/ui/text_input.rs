//! Single-line text field

use macroquad::prelude::*;
use super::{Rect, UiContext, ACCENT_COLOR, FONT_SIZE_CONTENT, TEXT_COLOR, TEXT_DIM};

const INPUT_BG: Color = Color::new(0.12, 0.12, 0.14, 1.0);
const INPUT_BORDER: Color = Color::new(0.3, 0.3, 0.32, 1.0);

/// What the user did to a field this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputResult {
    None,
    /// Enter pressed while focused
    Submitted,
    /// Escape pressed or clicked elsewhere
    Cancelled,
}

/// Text field state. Cursor is a byte index on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    pub text: String,
    pub cursor: usize,
    pub focused: bool,
    blink_timer: f32,
}

impl TextInputState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor, focused: false, blink_timer: 0.0 }
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.cursor = self.text.len();
        self.blink_timer = 0.0;
    }

    /// Hand back the text and empty the field
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((prev, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    fn handle_keys(&mut self) -> TextInputResult {
        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
            return TextInputResult::Submitted;
        }
        if is_key_pressed(KeyCode::Escape) {
            return TextInputResult::Cancelled;
        }
        if is_key_pressed(KeyCode::Left) {
            self.move_left();
        }
        if is_key_pressed(KeyCode::Right) {
            self.move_right();
        }
        if is_key_pressed(KeyCode::Home) {
            self.cursor = 0;
        }
        if is_key_pressed(KeyCode::End) {
            self.cursor = self.text.len();
        }
        if is_key_pressed(KeyCode::Backspace) {
            self.backspace();
        }
        while let Some(ch) = get_char_pressed() {
            if ch >= ' ' && ch != '\u{7f}' {
                self.insert_char(ch);
            }
        }
        TextInputResult::None
    }
}

/// Draw a text field; clicking focuses it, clicking elsewhere drops focus
pub fn draw_text_input(ctx: &mut UiContext, rect: Rect, state: &mut TextInputState, placeholder: &str) -> TextInputResult {
    let mut result = TextInputResult::None;
    if ctx.mouse.left_pressed {
        if ctx.mouse.inside(&rect) {
            if !state.focused {
                // Drop characters typed before focusing
                while get_char_pressed().is_some() {}
                state.focus();
            }
        } else if state.focused {
            state.focused = false;
            result = TextInputResult::Cancelled;
        }
    }
    if state.focused && result == TextInputResult::None {
        state.blink_timer += get_frame_time();
        result = state.handle_keys();
        if result != TextInputResult::None {
            state.focused = false;
        }
    }

    draw_rectangle(rect.x, rect.y, rect.w, rect.h, INPUT_BG);
    let border = if state.focused { ACCENT_COLOR } else { INPUT_BORDER };
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, border);

    let text_x = rect.x + 6.0;
    let text_y = (rect.y + (rect.h + FONT_SIZE_CONTENT * 0.7) * 0.5).round();
    if state.text.is_empty() && !state.focused {
        draw_text(placeholder, text_x, text_y, FONT_SIZE_CONTENT, TEXT_DIM);
    } else {
        draw_text(&state.text, text_x, text_y, FONT_SIZE_CONTENT, TEXT_COLOR);
    }

    if state.focused && (state.blink_timer % 1.0) < 0.5 {
        let offset = measure_text(&state.text[..state.cursor], None, FONT_SIZE_CONTENT as u16, 1.0).width;
        let x = text_x + offset;
        draw_line(x, rect.y + 4.0, x, rect.bottom() - 4.0, 1.0, TEXT_COLOR);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_respects_char_boundaries() {
        let mut state = TextInputState::new("Sé");
        state.backspace();
        assert_eq!(state.text, "S");

        state.insert_char('ø');
        state.move_left();
        state.insert_char('k');
        assert_eq!(state.text, "Skø");
        state.move_right();
        assert_eq!(state.cursor, state.text.len());
        state.move_right();
        assert_eq!(state.cursor, state.text.len());
    }

    #[test]
    fn test_take_empties_field() {
        let mut state = TextInputState::new("Sky");
        assert_eq!(state.take(), "Sky");
        assert!(state.text.is_empty());
        assert_eq!(state.cursor, 0);
        state.backspace();
        state.move_left();
        assert_eq!(state.cursor, 0);
    }
}
