//! Persistence for the per-URL status cache
//!
//! Two layers, mirroring how the cache travels between runs:
//! - the working cache *document*: one JSON file per site mapping URL to
//!   `{status, lastCheckedAt}`;
//! - the *blob store* ([`CacheStore`]): keyed save/restore of that document,
//!   where the primary key is unique per run and fallback prefixes restore
//!   the most recent prior save for the same site.

mod file;
mod traits;

pub use file::FileCacheStore;
pub use traits::{CacheStore, StorageError, StorageResult};

use crate::status::StatusCache;
use std::path::Path;

/// Loads the status cache document from `path`
///
/// A missing file is not an error; runs simply start with an empty cache.
pub fn load_status_document(path: &Path) -> StorageResult<StatusCache> {
    if !path.exists() {
        return Ok(StatusCache::new());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Writes the entire status cache document to `path`
///
/// Creates parent directories as needed. The whole cache is written,
/// including entries for URLs absent from the current sitemap.
pub fn save_status_document(path: &Path, cache: &StatusCache) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(cache)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{CoverageState, UrlStatusRecord};
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_is_empty_cache() {
        let dir = TempDir::new().unwrap();
        let cache = load_status_document(&dir.path().join("absent.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_document_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("site.json");

        let mut cache = StatusCache::new();
        cache.insert(
            "https://example.com/a".to_string(),
            UrlStatusRecord::checked_now(CoverageState::SubmittedAndIndexed),
        );
        cache.insert(
            "https://example.com/b".to_string(),
            UrlStatusRecord::checked_now(CoverageState::DiscoveredNotIndexed),
        );

        save_status_document(&path, &cache).unwrap();
        let reloaded = load_status_document(&path).unwrap();

        assert_eq!(cache, reloaded);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            load_status_document(&path),
            Err(StorageError::Serialization(_))
        ));
    }
}
