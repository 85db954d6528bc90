//! Placeable asset catalog
//!
//! ```text
//! content/                # content root
//! ├── Blocks/             # one category per folder
//! │   ├── Rock.ron        # one template per file, keyed by stem
//! │   └── Grass.ron
//! └── Enemies/
//!     └── Slime.ron
//! content_meta/
//! ├── Blocks.ron          # CategoryData: variants, alternates, transforms
//! └── Enemies.ron
//! ```

mod catalog;
mod category;
mod poll;

pub use catalog::*;
pub use category::*;
pub use poll::*;
