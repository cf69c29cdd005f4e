//! Configuration loading and validation
//!
//! Configuration is a TOML file describing the site, the service-account
//! credentials, checker behavior (concurrency, cache TTL, retry budget),
//! the local cache store, and optional endpoint overrides.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{AuthConfig, CacheConfig, CheckerConfig, Config, EndpointsConfig, SiteConfig};
pub use validation::validate;
