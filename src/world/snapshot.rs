//! Level snapshot loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable level files.
//! Supports both compressed (brotli) and uncompressed RON files.
//! - Reading: Auto-detects format by checking for valid RON start
//! - Writing: Always uses brotli compression

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::error::{EditError, EditResult};
use crate::math::Vec3;
use crate::storage::{Storage, StorageError};
use super::grid::{limits, Grid};

/// Current on-disk schema version
///
/// Version 1 is the per-layer sparse slot list. Files without a version
/// field predate versioning and share the same shape.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Validation limits to prevent resource exhaustion from malicious files
pub mod snapshot_limits {
    /// Maximum number of layers in a level
    pub const MAX_LAYERS: usize = 64;
    /// Maximum string length for names
    pub const MAX_STRING_LEN: usize = 256;
}

fn legacy_version() -> u32 {
    SNAPSHOT_VERSION
}

/// One occupied slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    /// `row * columns + col`
    pub index: usize,
    pub template: String,
    pub category: String,
}

/// One layer with its sparse slot list (omitted slots are empty)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub name: String,
    #[serde(default)]
    pub depth: f32,
    #[serde(default)]
    pub slots: Vec<SlotSnapshot>,
}

/// Persisted form of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub columns: usize,
    pub rows: usize,
    pub tile_size: f32,
    #[serde(default)]
    pub origin: Vec3,
    pub layers: Vec<LayerSnapshot>,
}

impl LevelSnapshot {
    /// Grid configuration declared by the snapshot
    pub fn grid(&self) -> EditResult<Grid> {
        Grid::with_origin(self.columns, self.rows, self.tile_size, self.origin)
            .map_err(|e| EditError::IncompatibleSnapshot(e.to_string()))
    }

    /// Check internal consistency. Nothing is restored from a snapshot that fails this.
    pub fn validate(&self) -> EditResult<()> {
        let fail = |msg: String| Err(EditError::IncompatibleSnapshot(msg));

        if self.version > SNAPSHOT_VERSION {
            return fail(format!(
                "version {} is newer than supported version {}",
                self.version, SNAPSHOT_VERSION
            ));
        }
        let grid = self.grid()?;

        if self.layers.len() > snapshot_limits::MAX_LAYERS {
            return fail(format!(
                "too many layers ({} > {})",
                self.layers.len(),
                snapshot_limits::MAX_LAYERS
            ));
        }

        let mut names = HashSet::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let context = format!("layer[{}]", i);
            if layer.name.trim().is_empty() || layer.name.len() > snapshot_limits::MAX_STRING_LEN {
                return fail(format!("{}: invalid name '{}'", context, layer.name));
            }
            if !names.insert(layer.name.as_str()) {
                return fail(format!("{}: duplicate name '{}'", context, layer.name));
            }
            if !layer.depth.is_finite() || layer.depth.abs() > limits::MAX_COORD {
                return fail(format!("{}: invalid depth {}", context, layer.depth));
            }

            let mut seen = HashSet::new();
            for slot in &layer.slots {
                if slot.index >= grid.cell_count() {
                    return fail(format!(
                        "{}: slot {} outside {}x{} grid",
                        context, slot.index, self.columns, self.rows
                    ));
                }
                if !seen.insert(slot.index) {
                    return fail(format!("{}: slot {} listed twice", context, slot.index));
                }
                if slot.template.is_empty()
                    || slot.template.len() > snapshot_limits::MAX_STRING_LEN
                    || slot.category.len() > snapshot_limits::MAX_STRING_LEN
                {
                    return fail(format!("{}: slot {} has an invalid template reference", context, slot.index));
                }
            }
        }
        Ok(())
    }

    /// Number of occupied slots across all layers
    pub fn occupied_count(&self) -> usize {
        self.layers.iter().map(|l| l.slots.len()).sum()
    }
}

/// Error type for level file IO
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("{0}")]
    Incompatible(#[from] EditError),
}

impl SnapshotError {
    fn invalid_data(msg: String) -> Self {
        SnapshotError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, msg))
    }
}

/// Parse level data from bytes (plain RON or brotli-compressed RON)
pub fn parse_snapshot(bytes: &[u8]) -> Result<LevelSnapshot, SnapshotError> {
    // RON files start with '(' or whitespace, brotli is binary
    let is_plain_ron = bytes
        .first()
        .map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t')
        .unwrap_or(false);

    let contents = if is_plain_ron {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| SnapshotError::invalid_data(format!("invalid UTF-8: {}", e)))?
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
            .map_err(|e| SnapshotError::invalid_data(format!("brotli decompression failed: {}", e)))?;
        String::from_utf8(decompressed)
            .map_err(|e| SnapshotError::invalid_data(format!("invalid UTF-8 after decompression: {}", e)))?
    };

    let snapshot: LevelSnapshot = match ron::from_str(&contents) {
        Ok(s) => s,
        Err(e) => {
            let line = contents.lines().nth(e.position.line.saturating_sub(1)).unwrap_or("");
            log::error!("RON parse error at line {}: {} ({})", e.position.line, e, line.trim());
            return Err(e.into());
        }
    };

    snapshot.validate()?;
    Ok(snapshot)
}

/// Serialize a snapshot to plain RON text
pub fn snapshot_to_ron(snapshot: &LevelSnapshot) -> Result<String, SnapshotError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(snapshot, config)?)
}

/// Serialize a snapshot to compressed bytes
pub fn serialize_snapshot(snapshot: &LevelSnapshot) -> Result<Vec<u8>, SnapshotError> {
    let ron_string = snapshot_to_ron(snapshot)?;

    // Quality 6, window 22
    let mut compressed = Vec::new();
    brotli::BrotliCompress(
        &mut Cursor::new(ron_string.as_bytes()),
        &mut compressed,
        &brotli::enc::BrotliEncoderParams {
            quality: 6,
            lgwin: 22,
            ..Default::default()
        },
    )?;

    Ok(compressed)
}

/// Load a level snapshot from a file
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<LevelSnapshot, SnapshotError> {
    let bytes = std::fs::read(path)?;
    parse_snapshot(&bytes)
}

/// Save a level snapshot to a compressed file
pub fn save_snapshot<P: AsRef<Path>>(snapshot: &LevelSnapshot, path: P) -> Result<(), SnapshotError> {
    let data = serialize_snapshot(snapshot)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Load a level snapshot through the storage backend
pub fn load_snapshot_with_storage(path: &str, storage: &Storage) -> Result<LevelSnapshot, SnapshotError> {
    let bytes = storage.read(path)?;
    parse_snapshot(&bytes)
}

/// Save a level snapshot through the storage backend
pub fn save_snapshot_with_storage(snapshot: &LevelSnapshot, path: &str, storage: &Storage) -> Result<(), SnapshotError> {
    let data = serialize_snapshot(snapshot)?;
    storage.write(path, &data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> LevelSnapshot {
        LevelSnapshot {
            version: SNAPSHOT_VERSION,
            columns: 20,
            rows: 10,
            tile_size: 1.0,
            origin: Vec3::ZERO,
            layers: vec![
                LayerSnapshot {
                    name: "Logic".into(),
                    depth: 0.0,
                    slots: vec![SlotSnapshot {
                        index: 65,
                        template: "Rock".into(),
                        category: "Blocks".into(),
                    }],
                },
                LayerSnapshot {
                    name: "Graphics".into(),
                    depth: 2.0,
                    slots: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_compressed_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("level.ron");
        save_snapshot(&sample(), &path).unwrap();

        // Written compressed, so not plain RON
        let bytes = std::fs::read(&path).unwrap();
        assert_ne!(bytes.first(), Some(&b'('));

        assert_eq!(load_snapshot(&path).unwrap(), sample());
    }

    #[test]
    fn test_plain_ron_accepted() {
        let text = snapshot_to_ron(&sample()).unwrap();
        assert_eq!(parse_snapshot(text.as_bytes()).unwrap(), sample());
    }

    #[test]
    fn test_missing_version_reads_as_current() {
        let text = "(columns: 2, rows: 2, tile_size: 1.0, layers: [(name: \"Ground\")])";
        let snapshot = parse_snapshot(text.as_bytes()).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.origin, Vec3::ZERO);
        assert!(snapshot.layers[0].slots.is_empty());
    }

    #[test]
    fn test_future_version_rejected() {
        let mut snapshot = sample();
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert!(matches!(snapshot.validate(), Err(EditError::IncompatibleSnapshot(_))));
    }

    #[test]
    fn test_slot_outside_grid_rejected() {
        let mut snapshot = sample();
        snapshot.layers[0].slots[0].index = 200;
        assert!(matches!(snapshot.validate(), Err(EditError::IncompatibleSnapshot(_))));
    }

    #[test]
    fn test_duplicate_slot_and_layer_rejected() {
        let mut snapshot = sample();
        let dup = snapshot.layers[0].slots[0].clone();
        snapshot.layers[0].slots.push(dup);
        assert!(snapshot.validate().is_err());

        let mut snapshot = sample();
        snapshot.layers[1].name = "Logic".into();
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_snapshot(b"(columns: oops").is_err());
        assert!(parse_snapshot(&[0xff, 0x00, 0x13]).is_err());
    }

    #[test]
    fn test_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_base_dir(dir.path());
        save_snapshot_with_storage(&sample(), "levels/a.ron", &storage).unwrap();
        let loaded = load_snapshot_with_storage("levels/a.ron", &storage).unwrap();
        assert_eq!(loaded.occupied_count(), 1);
    }
}
