use serde::Deserialize;

/// Main configuration structure for gsc-indexer
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub checker: CheckerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// The site to process
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site identity: a full URL for URL-prefix properties
    /// (e.g. "https://example.com") or a bare domain for domain properties
    /// (e.g. "example.com")
    pub url: String,
}

/// Credential configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Path to the Google service-account key JSON file
    #[serde(rename = "service-account-key-path")]
    pub service_account_key_path: String,
}

/// Status-check behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerConfig {
    /// Maximum concurrent status checks per batch
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Maximum age of a cached non-indexable status before re-verification (days)
    #[serde(rename = "cache-ttl-days", default = "default_cache_ttl_days")]
    pub cache_ttl_days: i64,

    /// Total attempts per remote request, including the first
    #[serde(rename = "retry-attempts", default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Base delay between retry attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            cache_ttl_days: default_cache_ttl_days(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Local cache store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the working cache document and keyed saves
    #[serde(default = "default_cache_directory")]
    pub directory: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: default_cache_directory(),
        }
    }
}

/// Remote endpoint base URLs; overridable for testing
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    /// Search Console API base (sitemap listing, URL inspection)
    #[serde(rename = "search-console", default = "default_search_console")]
    pub search_console: String,

    /// Indexing API base (publish metadata, submission)
    #[serde(default = "default_indexing")]
    pub indexing: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            search_console: default_search_console(),
            indexing: default_indexing(),
        }
    }
}

fn default_concurrency() -> usize {
    50
}

fn default_cache_ttl_days() -> i64 {
    7
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_cache_directory() -> String {
    ".cache".to_string()
}

fn default_search_console() -> String {
    "https://searchconsole.googleapis.com".to_string()
}

fn default_indexing() -> String {
    "https://indexing.googleapis.com".to_string()
}
