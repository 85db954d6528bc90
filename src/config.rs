//! Editor configuration
//!
//! Stored as RON in the user config dir (`<config>/strata/config.ron`).
//! Every field has a default so partial or older files keep loading.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::asset::{CONTENT_DIR, DEFAULT_QUEUE_CAPACITY, METADATA_DIR};
use crate::world::{Grid, DEFAULT_LAYERS};

/// Config file name inside the app's config dir
pub const CONFIG_FILE: &str = "config.ron";

/// Default +/- layer depth step
pub const DEFAULT_DEPTH_STEP: f32 = 2.0;

/// Default +/- tile size step
pub const DEFAULT_TILE_STEP: f32 = 0.25;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Template folders, relative to the working directory
    pub content_root: String,
    /// Category metadata files
    pub metadata_dir: String,
    /// Level files
    pub levels_dir: String,
    pub default_columns: usize,
    pub default_rows: usize,
    pub default_tile_size: f32,
    /// Amount the Layer Depth +/- commands shift by
    pub depth_step: f32,
    /// Amount the Tile +/- commands change the tile size by
    pub tile_step: f32,
    /// Layers of a new level
    pub default_layers: Vec<String>,
    /// Asset notification queue bound
    pub queue_capacity: usize,
    /// env_logger filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let grid = Grid::default();
        Self {
            content_root: CONTENT_DIR.to_string(),
            metadata_dir: METADATA_DIR.to_string(),
            levels_dir: "levels".to_string(),
            default_columns: grid.columns,
            default_rows: grid.rows,
            default_tile_size: grid.tile_size,
            depth_step: DEFAULT_DEPTH_STEP,
            tile_step: DEFAULT_TILE_STEP,
            default_layers: DEFAULT_LAYERS.iter().map(|s| s.to_string()).collect(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            log_filter: "info".to_string(),
        }
    }
}

impl EditorConfig {
    /// Default location of the config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("strata")
            .join(CONFIG_FILE)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Grid a new level starts with
    pub fn grid(&self) -> Result<Grid, ConfigError> {
        Grid::new(self.default_columns, self.default_rows, self.default_tile_size)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid()?;
        if !self.depth_step.is_finite() || self.depth_step <= 0.0 {
            return Err(ConfigError::Invalid(format!("depth_step must be positive, got {}", self.depth_step)));
        }
        if !self.tile_step.is_finite() || self.tile_step <= 0.0 {
            return Err(ConfigError::Invalid(format!("tile_step must be positive, got {}", self.tile_step)));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Load from a file, falling back to defaults if it is missing or broken.
    /// A broken file's error is handed back so it can be reported once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => (Self::default(), None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Write to a file, creating its directory
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_new_level() {
        let config = EditorConfig::default();
        assert_eq!(config.default_columns, 20);
        assert_eq!(config.default_rows, 10);
        assert_eq!(config.default_tile_size, 1.0);
        assert_eq!(config.depth_step, 2.0);
        assert_eq!(config.default_layers, vec!["Logic".to_string(), "Graphics".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = EditorConfig::from_ron("(default_columns: 32, log_filter: \"debug\")").unwrap();
        assert_eq!(config.default_columns, 32);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.default_rows, 10);
        assert_eq!(config.content_root, CONTENT_DIR);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EditorConfig::from_ron("(default_tile_size: 0.0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_ron("(queue_capacity: 0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_ron("(tile_step: -1.0)"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = EditorConfig {
            depth_step: 0.5,
            default_layers: vec!["Ground".into()],
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_or_broken_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.ron");
        let (config, error) = EditorConfig::load_or_default(&missing);
        assert_eq!(config, EditorConfig::default());
        assert!(error.is_none());

        let broken = dir.path().join("broken.ron");
        std::fs::write(&broken, "(default_columns: ").unwrap();
        let (config, error) = EditorConfig::load_or_default(&broken);
        assert_eq!(config, EditorConfig::default());
        assert!(matches!(error, Some(ConfigError::Parse(_))));
    }
}
