//! Immediate-mode UI helpers for the level editor
//!
//! - Rectangle-based layout, rebuilt each frame
//! - Mouse state and pointer capture
//! - Text buttons, list rows, tooltips, text fields
//! - Action registry shared by toolbar and shortcuts

mod actions;
mod input;
mod rect;
mod text_input;
mod theme;
mod widgets;

pub use actions::*;
pub use input::*;
pub use rect::*;
pub use text_input::*;
pub use theme::*;
pub use widgets::*;
