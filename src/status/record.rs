//! Cached per-URL status records and the staleness policy
//!
//! The status cache is the only state that survives between runs. It maps
//! each URL to the coverage state seen at its last successful check, and
//! `should_recheck` decides whether that record can be trusted or a fresh
//! remote check is required.

use crate::status::CoverageState;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Last-known indexing status of a single URL
///
/// Records are replaced wholesale on recheck, never partially mutated.
/// Field names match the persisted JSON document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlStatusRecord {
    /// Coverage state reported by the last successful check
    pub status: CoverageState,

    /// When the last successful check happened
    #[serde(rename = "lastCheckedAt")]
    pub last_checked_at: DateTime<Utc>,
}

impl UrlStatusRecord {
    /// Creates a record for a check performed right now
    pub fn checked_now(status: CoverageState) -> Self {
        Self {
            status,
            last_checked_at: Utc::now(),
        }
    }
}

/// In-memory mapping of URL to last-known status
///
/// Loaded from the external store at the start of a run and persisted in its
/// entirety at the end, including entries for URLs no longer present in the
/// current sitemap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCache {
    entries: HashMap<String, UrlStatusRecord>,
}

impl StatusCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the record for a URL
    pub fn get(&self, url: &str) -> Option<&UrlStatusRecord> {
        self.entries.get(url)
    }

    /// Inserts or replaces the record for a URL
    pub fn insert(&mut self, url: String, record: UrlStatusRecord) {
        self.entries.insert(url, record);
    }

    /// Number of cached URLs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no URLs are cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all cached entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &UrlStatusRecord)> {
        self.entries.iter()
    }
}

/// Decides whether a cached record needs a fresh remote check
///
/// Returns true when:
/// - the cached status is indexable (those states can flip at any time), or
/// - the record is older than `ttl` relative to `now`.
///
/// A confidently indexed status checked recently is trusted without a new
/// remote call. Pure function; monotonic in staleness.
pub fn should_recheck(
    status: &CoverageState,
    last_checked_at: DateTime<Utc>,
    now: DateTime<Utc>,
    ttl: Duration,
) -> bool {
    status.is_indexable() || last_checked_at < now - ttl
}

/// Builds the ephemeral per-status buckets from `(url, record)` pairs
///
/// URLs keep their input order within each bucket. The result is a pure
/// projection for reporting and eligible-set derivation; it is never
/// persisted and never feeds back into the cache.
pub fn bucket_by_status<'a, I>(results: I) -> Vec<(CoverageState, Vec<String>)>
where
    I: IntoIterator<Item = (&'a String, &'a UrlStatusRecord)>,
{
    let mut buckets: Vec<(CoverageState, Vec<String>)> = Vec::new();
    for (url, record) in results {
        match buckets.iter_mut().find(|(status, _)| *status == record.status) {
            Some((_, urls)) => urls.push(url.clone()),
            None => buckets.push((record.status.clone(), vec![url.clone()])),
        }
    }
    buckets
}
