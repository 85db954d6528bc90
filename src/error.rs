//! Editing errors
//!
//! Every error here is a declined edit: the caller logs it and carries on.

use thiserror::Error;

/// Errors returned by grid, layer, placement and catalog operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Placement or erase target outside the grid extent
    #[error("cell ({col}, {row}) is outside the {columns}x{rows} grid")]
    OutOfBounds {
        col: i64,
        row: i64,
        columns: usize,
        rows: usize,
    },

    /// Layer index outside the current layer range
    #[error("layer {index} does not exist ({count} layers)")]
    InvalidLayer { index: usize, count: usize },

    /// Layer name empty or already taken
    #[error("invalid layer name '{0}'")]
    InvalidLayerName(String),

    /// Grid dimensions or tile size rejected
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Snapshot shape does not match the level it is restored into
    #[error("incompatible snapshot: {0}")]
    IncompatibleSnapshot(String),

    /// Unknown category/variant pair
    #[error("no template registered for '{variant}' in category '{category}'")]
    MissingTemplate { category: String, variant: String },

    /// Category not indexed by the catalog yet
    #[error("category '{0}' is not in the catalog")]
    CatalogDesync(String),
}

/// Result type for editing operations.
pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_target() {
        let e = EditError::OutOfBounds { col: -1, row: 3, columns: 20, rows: 10 };
        assert_eq!(e.to_string(), "cell (-1, 3) is outside the 20x10 grid");

        let e = EditError::MissingTemplate {
            category: "Enemies".into(),
            variant: "Slime".into(),
        };
        assert!(e.to_string().contains("Slime"));
        assert!(e.to_string().contains("Enemies"));
    }
}
