//! Coverage state definitions for tracking per-URL indexing status
//!
//! This module defines the closed vocabulary of coverage states the URL
//! inspection endpoint reports for a page, plus the two locally-assigned
//! states (`Forbidden`, `Error`) used when a check itself fails.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the indexing coverage state of a single URL
///
/// Business logic only ever cares about membership in the indexable subset
/// (see [`CoverageState::is_indexable`]); everything else is carried opaquely
/// so that states the remote service adds later survive a cache round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CoverageState {
    /// Page is indexed; nothing to do
    SubmittedAndIndexed,

    /// Page was deduplicated against another URL without a user-selected canonical
    DuplicateWithoutCanonical,

    /// Page was crawled but not (yet) indexed
    CrawledNotIndexed,

    /// Page was discovered but not yet crawled
    DiscoveredNotIndexed,

    /// Page redirects elsewhere
    PageWithRedirect,

    /// Google has never seen this URL
    UnknownToGoogle,

    /// Locally assigned: the inspection call was rejected with HTTP 403
    Forbidden,

    /// Locally assigned: the inspection call returned another non-success status
    Error,

    /// Any coverage state this crate does not model explicitly
    Other(String),
}

impl CoverageState {
    /// Returns true if this state marks the URL as a candidate for an
    /// indexing request
    ///
    /// Indexable states represent "not yet indexed" conditions that can
    /// change, so cached records carrying them are always re-checked.
    pub fn is_indexable(&self) -> bool {
        matches!(
            self,
            Self::DiscoveredNotIndexed
                | Self::CrawledNotIndexed
                | Self::UnknownToGoogle
                | Self::Forbidden
                | Self::Error
        )
    }

    /// Returns the emoji used when summarizing this state in run output
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::SubmittedAndIndexed => "✅",
            Self::DuplicateWithoutCanonical => "😵",
            Self::CrawledNotIndexed | Self::DiscoveredNotIndexed => "👀",
            Self::PageWithRedirect => "🔀",
            Self::UnknownToGoogle => "❓",
            Self::Forbidden | Self::Error | Self::Other(_) => "❌",
        }
    }

    /// Converts the state to the wire/cache string representation
    ///
    /// These are the exact strings the URL inspection endpoint reports in
    /// `coverageState`, and the strings stored in the persisted cache.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SubmittedAndIndexed => "Submitted and indexed",
            Self::DuplicateWithoutCanonical => "Duplicate without user-selected canonical",
            Self::CrawledNotIndexed => "Crawled - currently not indexed",
            Self::DiscoveredNotIndexed => "Discovered - currently not indexed",
            Self::PageWithRedirect => "Page with redirect",
            Self::UnknownToGoogle => "URL is unknown to Google",
            Self::Forbidden => "Forbidden",
            Self::Error => "Error",
            Self::Other(s) => s,
        }
    }

    /// All explicitly modeled states (everything except `Other`)
    #[cfg(test)]
    pub fn known_states() -> Vec<Self> {
        vec![
            Self::SubmittedAndIndexed,
            Self::DuplicateWithoutCanonical,
            Self::CrawledNotIndexed,
            Self::DiscoveredNotIndexed,
            Self::PageWithRedirect,
            Self::UnknownToGoogle,
            Self::Forbidden,
            Self::Error,
        ]
    }
}

impl From<String> for CoverageState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Submitted and indexed" => Self::SubmittedAndIndexed,
            "Duplicate without user-selected canonical" => Self::DuplicateWithoutCanonical,
            "Crawled - currently not indexed" => Self::CrawledNotIndexed,
            "Discovered - currently not indexed" => Self::DiscoveredNotIndexed,
            "Page with redirect" => Self::PageWithRedirect,
            "URL is unknown to Google" => Self::UnknownToGoogle,
            "Forbidden" => Self::Forbidden,
            "Error" => Self::Error,
            _ => Self::Other(s),
        }
    }
}

impl From<CoverageState> for String {
    fn from(state: CoverageState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for CoverageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
