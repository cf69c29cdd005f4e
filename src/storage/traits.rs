//! Storage traits and error types

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Save source missing: {0}")]
    SourceMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Keyed blob save/restore for the status cache document
///
/// Modeled on an external key-value cache service: `save` stores the file at
/// `path` under a key that is unique per run, and `restore` brings back
/// either that exact key or, failing that, the most recent prior save whose
/// key starts with one of the fallback prefixes.
pub trait CacheStore {
    /// Restores a previously saved blob into `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Where to place the restored file
    /// * `primary_key` - Exact key to prefer
    /// * `fallback_keys` - Key prefixes, tried in order; within a prefix the
    ///   most recent save wins
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A blob was restored into `path`
    /// * `Ok(false)` - No matching save exists (not an error)
    fn restore(&self, path: &Path, primary_key: &str, fallback_keys: &[&str])
        -> StorageResult<bool>;

    /// Saves the file at `path` under `key`
    fn save(&self, path: &Path, key: &str) -> StorageResult<()>;
}
