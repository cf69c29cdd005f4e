//! Filesystem-backed cache store
//!
//! Saves are plain files named `<key>.json` under a store root. Because save
//! keys end in a fixed-width millisecond timestamp, the lexicographically
//! greatest file name within a key prefix is also the most recent save, so
//! fallback restore is a directory scan plus a copy.

use crate::storage::traits::{CacheStore, StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Cache store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    root: PathBuf,
}

impl FileCacheStore {
    /// Creates a store rooted at `root`; the directory is created lazily on
    /// first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Finds the most recent saved key matching `prefix`, if any
    fn latest_key_with_prefix(&self, prefix: &str) -> StorageResult<Option<PathBuf>> {
        if !self.root.is_dir() {
            return Ok(None);
        }

        let mut best: Option<(String, PathBuf)> = None;
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            if !name.starts_with(prefix) {
                continue;
            }
            match &best {
                Some((best_name, _)) if *best_name >= name => {}
                _ => best = Some((name, path)),
            }
        }

        Ok(best.map(|(_, path)| path))
    }
}

impl CacheStore for FileCacheStore {
    fn restore(
        &self,
        path: &Path,
        primary_key: &str,
        fallback_keys: &[&str],
    ) -> StorageResult<bool> {
        let source = if self.blob_path(primary_key).exists() {
            Some(self.blob_path(primary_key))
        } else {
            let mut found = None;
            for prefix in fallback_keys {
                if let Some(candidate) = self.latest_key_with_prefix(prefix)? {
                    found = Some(candidate);
                    break;
                }
            }
            found
        };

        match source {
            Some(source) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(&source, path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn save(&self, path: &Path, key: &str) -> StorageResult<()> {
        if !path.exists() {
            return Err(StorageError::SourceMissing(path.display().to_string()));
        }
        std::fs::create_dir_all(&self.root)?;
        std::fs::copy(path, self.blob_path(key))?;
        Ok(())
    }
}
