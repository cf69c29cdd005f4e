//! gsc-indexer: bulk search-engine indexing requests for a site
//!
//! This crate drives "request indexing" workflows against Google Search
//! Console and the Indexing API: it enumerates a site's URLs from its
//! sitemaps, checks which ones are not yet indexed (re-using a persisted
//! per-URL status cache between runs), and submits indexing requests for the
//! eligible ones without double-submitting.

pub mod auth;
pub mod batch;
pub mod config;
pub mod fetch;
pub mod gsc;
pub mod orchestrator;
pub mod site;
pub mod status;
pub mod storage;

use thiserror::Error;

/// Main error type for gsc-indexer operations
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("No sitemaps found for {site}, add them to Google Search Console and try again")]
    NoSitemaps { site: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for gsc-indexer operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use orchestrator::Orchestrator;
pub use site::convert_to_site_url;
pub use status::{should_recheck, CoverageState, StatusCache, UrlStatusRecord};
