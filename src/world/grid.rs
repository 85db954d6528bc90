//! Grid model
//!
//! Rectangular cell grid on the X/Y plane. Cells are half-open intervals
//! `[n, n+1)` in tile units measured from the origin, so floor conversion
//! never has to break ties.

use serde::{Deserialize, Serialize};
use crate::error::{EditError, EditResult};
use crate::math::Vec3;

/// Validation limits for grid configuration
pub mod limits {
    /// Maximum columns or rows
    pub const MAX_DIMENSION: usize = 4096;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// Default grid width in cells
pub const DEFAULT_COLUMNS: usize = 20;
/// Default grid height in cells
pub const DEFAULT_ROWS: usize = 10;
/// Default tile edge length in world units
pub const DEFAULT_TILE_SIZE: f32 = 1.0;

/// Cell grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: usize,
    pub rows: usize,
    pub tile_size: f32,
    /// World-space anchor of cell (0, 0)'s lower corner
    #[serde(default)]
    pub origin: Vec3,
}

impl Grid {
    /// Create a validated grid anchored at the world origin
    pub fn new(columns: usize, rows: usize, tile_size: f32) -> EditResult<Self> {
        Self::with_origin(columns, rows, tile_size, Vec3::ZERO)
    }

    /// Create a validated grid with an explicit anchor
    pub fn with_origin(columns: usize, rows: usize, tile_size: f32, origin: Vec3) -> EditResult<Self> {
        let grid = Self { columns, rows, tile_size, origin };
        grid.validate()?;
        Ok(grid)
    }

    /// Check dimensions, tile size and origin
    pub fn validate(&self) -> EditResult<()> {
        validate_dimensions(self.columns, self.rows)?;
        validate_tile_size(self.tile_size)?;
        if !self.origin.is_finite() || self.origin.x.abs() > limits::MAX_COORD || self.origin.y.abs() > limits::MAX_COORD {
            return Err(EditError::InvalidGrid(format!(
                "origin ({}, {}, {}) out of range",
                self.origin.x, self.origin.y, self.origin.z
            )));
        }
        Ok(())
    }

    /// Total number of cells per layer
    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// World-space width of the grid
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// World-space height of the grid
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Convert a world point to (col, row) using floor semantics.
    /// The result may be out of bounds; check with `contains_cell`.
    pub fn world_to_cell(&self, point: Vec3) -> (i64, i64) {
        let col = ((point.x - self.origin.x) / self.tile_size).floor();
        let row = ((point.y - self.origin.y) / self.tile_size).floor();
        (col as i64, row as i64)
    }

    /// Center of a cell on the X/Y plane, at the given layer depth
    pub fn cell_to_world(&self, col: usize, row: usize, depth: f32) -> Vec3 {
        Vec3::new(
            self.origin.x + (col as f32 + 0.5) * self.tile_size,
            self.origin.y + (row as f32 + 0.5) * self.tile_size,
            self.origin.z + depth,
        )
    }

    /// Is (col, row) inside the grid
    pub fn contains_cell(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && (col as u64) < self.columns as u64 && (row as u64) < self.rows as u64
    }

    /// Is a world point inside the grid extent (X/Y only, half-open)
    pub fn contains_point(&self, point: Vec3) -> bool {
        let min_x = self.origin.x;
        let min_y = self.origin.y;
        point.x >= min_x
            && point.x < min_x + self.width()
            && point.y >= min_y
            && point.y < min_y + self.height()
    }

    /// Bounds-checked cell lookup, returning unsigned indices
    pub fn checked_cell(&self, col: i64, row: i64) -> EditResult<(usize, usize)> {
        if self.contains_cell(col, row) {
            Ok((col as usize, row as usize))
        } else {
            Err(EditError::OutOfBounds {
                col,
                row,
                columns: self.columns,
                rows: self.rows,
            })
        }
    }

    /// Flat slot index of a cell (`row * columns + col`)
    pub fn slot_index(&self, col: usize, row: usize) -> usize {
        row * self.columns + col
    }

    /// Inverse of `slot_index`
    pub fn slot_cell(&self, index: usize) -> (usize, usize) {
        (index % self.columns, index / self.columns)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            tile_size: DEFAULT_TILE_SIZE,
            origin: Vec3::ZERO,
        }
    }
}

pub(crate) fn validate_dimensions(columns: usize, rows: usize) -> EditResult<()> {
    if columns == 0 || rows == 0 {
        return Err(EditError::InvalidGrid(format!(
            "dimensions must be positive (got {}x{})",
            columns, rows
        )));
    }
    if columns > limits::MAX_DIMENSION || rows > limits::MAX_DIMENSION {
        return Err(EditError::InvalidGrid(format!(
            "dimensions too large ({}x{} > {})",
            columns, rows, limits::MAX_DIMENSION
        )));
    }
    Ok(())
}

pub(crate) fn validate_tile_size(tile_size: f32) -> EditResult<()> {
    if !tile_size.is_finite() || tile_size <= 0.0 {
        return Err(EditError::InvalidGrid(format!("tile size must be positive (got {})", tile_size)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_world_centers() {
        let grid = Grid::new(20, 10, 1.0).unwrap();
        let p = grid.cell_to_world(5, 3, 0.0);
        assert!(p.approx_eq(Vec3::new(5.5, 3.5, 0.0), 1e-6));

        let offset = Grid::with_origin(4, 4, 2.0, Vec3::new(10.0, -4.0, 1.0)).unwrap();
        let p = offset.cell_to_world(1, 0, 3.0);
        assert!(p.approx_eq(Vec3::new(13.0, -3.0, 4.0), 1e-6));
    }

    #[test]
    fn test_world_to_cell_floor() {
        let grid = Grid::new(20, 10, 1.0).unwrap();
        assert_eq!(grid.world_to_cell(Vec3::new(5.0, 3.0, 0.0)), (5, 3));
        assert_eq!(grid.world_to_cell(Vec3::new(5.999, 3.999, 0.0)), (5, 3));
        // Negative side floors away from zero instead of truncating
        assert_eq!(grid.world_to_cell(Vec3::new(-0.25, 0.5, 0.0)), (-1, 0));
    }

    #[test]
    fn test_round_trip_every_cell() {
        let grid = Grid::with_origin(7, 5, 0.75, Vec3::new(-3.0, 2.0, 0.0)).unwrap();
        for row in 0..grid.rows {
            for col in 0..grid.columns {
                let world = grid.cell_to_world(col, row, 4.0);
                assert_eq!(grid.world_to_cell(world), (col as i64, row as i64));
            }
        }
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(20, 10, 1.0).unwrap();
        assert!(grid.contains_cell(0, 0));
        assert!(grid.contains_cell(19, 9));
        assert!(!grid.contains_cell(20, 0));
        assert!(!grid.contains_cell(0, 10));
        assert!(!grid.contains_cell(-1, 0));

        assert!(grid.contains_point(Vec3::new(0.0, 0.0, 5.0)));
        assert!(grid.contains_point(Vec3::new(19.99, 9.99, 0.0)));
        assert!(!grid.contains_point(Vec3::new(20.0, 5.0, 0.0)));
        assert!(!grid.contains_point(Vec3::new(-0.01, 5.0, 0.0)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(Grid::new(0, 10, 1.0), Err(EditError::InvalidGrid(_))));
        assert!(matches!(Grid::new(10, 10, 0.0), Err(EditError::InvalidGrid(_))));
        assert!(matches!(Grid::new(10, 10, f32::NAN), Err(EditError::InvalidGrid(_))));
    }

    #[test]
    fn test_slot_index_round_trip() {
        let grid = Grid::new(20, 10, 1.0).unwrap();
        assert_eq!(grid.slot_index(5, 3), 65);
        assert_eq!(grid.slot_cell(65), (5, 3));
    }

    #[test]
    fn test_checked_cell_error() {
        let grid = Grid::new(2, 2, 1.0).unwrap();
        assert_eq!(grid.checked_cell(1, 1), Ok((1, 1)));
        assert_eq!(
            grid.checked_cell(2, 0),
            Err(EditError::OutOfBounds { col: 2, row: 0, columns: 2, rows: 2 })
        );
    }
}
