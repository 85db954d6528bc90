//! Storage Layer
//!
//! All editor persistence goes through here: level files, category
//! metadata and the config file. Paths are relative to a base directory.
//! Every operation completes synchronously, which matches the editor's
//! single-threaded event loop.

pub mod local;

pub use local::LocalStorage as Storage;

use thiserror::Error;

/// Storage error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// File or directory not found
    #[error("not found: {0}")]
    NotFound(String),
    /// Permission denied
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
    /// File too large
    #[error("file too large: {size} bytes (max: {max})")]
    FileTooLarge { size: u64, max: u64 },
    /// Path escapes the storage root
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
            _ => StorageError::IoError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let e: StorageError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, StorageError::NotFound(_)));

        let e: StorageError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no").into();
        assert!(matches!(e, StorageError::PermissionDenied(_)));

        let e: StorageError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert_eq!(e, StorageError::IoError("boom".into()));
    }
}
