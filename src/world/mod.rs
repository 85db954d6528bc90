//! World module - layered grid levels
//!
//! - Grid model: cell <-> world conversion and bounds
//! - Level: layers of slots holding placed instances
//! - Snapshot: versioned on-disk form of a level
//! - Host: the external scene that owns spawned instances

mod grid;
mod host;
mod level;
mod snapshot;

pub use grid::*;
pub use host::*;
pub use level::*;
pub use snapshot::*;
