//! Local filesystem storage backend
//!
//! Wraps standard filesystem operations rooted at a base directory.

use super::StorageError;
use std::path::{Component, Path, PathBuf};

/// Largest file the editor will read (level files and metadata are small)
pub const MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Local filesystem storage backend
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Base directory for relative paths (usually current working directory)
    base_dir: PathBuf,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage {
    /// Create a new local storage backend rooted at the current directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }

    /// Create a local storage backend with a custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Base directory all paths resolve against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a path relative to the base directory.
    /// Absolute paths are used as-is; `..` segments are refused.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let p = Path::new(path);
        if p.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        if p.is_absolute() {
            Ok(p.to_path_buf())
        } else {
            Ok(self.base_dir.join(p))
        }
    }

    /// List files in a directory (names only, sorted)
    pub fn list(&self, path: &str) -> Result<Vec<String>, StorageError> {
        self.list_entries(path, false)
    }

    /// List sub-directories of a directory (names only, sorted)
    pub fn list_dirs(&self, path: &str) -> Result<Vec<String>, StorageError> {
        self.list_entries(path, true)
    }

    fn list_entries(&self, path: &str, dirs: bool) -> Result<Vec<String>, StorageError> {
        let full_path = self.resolve(path)?;
        let mut names: Vec<String> = std::fs::read_dir(&full_path)?
            .filter_map(|e| e.ok())
            .filter(|e| if dirs { e.path().is_dir() } else { e.path().is_file() })
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Read a file
    pub fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve(path)?;
        let size = std::fs::metadata(&full_path)?.len();
        if size > MAX_FILE_SIZE {
            return Err(StorageError::FileTooLarge { size, max: MAX_FILE_SIZE });
        }
        Ok(std::fs::read(&full_path)?)
    }

    /// Read a file as UTF-8
    pub fn read_string(&self, path: &str) -> Result<String, StorageError> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| StorageError::IoError(e.to_string()))
    }

    /// Write a file, creating parent directories as needed
    pub fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, data)?;
        Ok(())
    }

    /// Write a string to a file
    pub fn write_string(&self, path: &str, content: &str) -> Result<(), StorageError> {
        self.write(path, content.as_bytes())
    }

    /// Delete a file. A missing file is not an error.
    pub fn delete(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        match std::fs::remove_file(&full_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a directory and its parents
    pub fn create_dir(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        std::fs::create_dir_all(full_path)?;
        Ok(())
    }

    /// Check if a file or directory exists
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }

    /// Check if a path exists and is a directory
    pub fn is_dir(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_dir()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path());
        (dir, storage)
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let (_dir, storage) = setup_test_dir();

        storage.write("meta/Enemies.ron", b"data").unwrap();
        assert_eq!(storage.read("meta/Enemies.ron").unwrap(), b"data");
    }

    #[test]
    fn test_read_not_found() {
        let (_dir, storage) = setup_test_dir();
        assert!(matches!(storage.read("missing.ron"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_files_and_dirs_separately() {
        let (dir, storage) = setup_test_dir();

        std::fs::create_dir(dir.path().join("Enemies")).unwrap();
        std::fs::create_dir(dir.path().join("Blocks")).unwrap();
        std::fs::write(dir.path().join("b.ron"), "b").unwrap();
        std::fs::write(dir.path().join("a.ron"), "a").unwrap();
        std::fs::write(dir.path().join(".hidden"), "x").unwrap();

        assert_eq!(storage.list(".").unwrap(), vec!["a.ron", "b.ron"]);
        assert_eq!(storage.list_dirs(".").unwrap(), vec!["Blocks", "Enemies"]);
    }

    #[test]
    fn test_is_dir() {
        let (dir, storage) = setup_test_dir();
        std::fs::create_dir(dir.path().join("Props.old")).unwrap();
        std::fs::write(dir.path().join("Crate.ron"), "()").unwrap();

        assert!(storage.is_dir("Props.old"));
        assert!(!storage.is_dir("Crate.ron"));
        assert!(!storage.is_dir("missing"));
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let (dir, storage) = setup_test_dir();
        std::fs::write(dir.path().join("gone.ron"), "x").unwrap();

        storage.delete("gone.ron").unwrap();
        assert!(!storage.exists("gone.ron"));
        storage.delete("gone.ron").unwrap();
    }

    #[test]
    fn test_parent_dir_refused() {
        let (_dir, storage) = setup_test_dir();
        assert!(matches!(storage.write("../escape.ron", b"x"), Err(StorageError::InvalidPath(_))));
        assert!(!storage.exists("../escape.ron"));
    }
}
