//! Level Editor
//!
//! - Session: owns level, catalog, palette and scene host
//! - Controller: pointer input -> grid edits on the selected layer
//! - Palette: pick a catalog variant to paint
//! - Actions: command registry shared by toolbar and shortcuts
//! - Layout: macroquad front end

mod actions;
mod controller;
mod events;
mod layout;
mod palette;
mod session;

pub use actions::*;
pub use controller::*;
pub use events::*;
pub use layout::*;
pub use palette::*;
pub use session::*;
