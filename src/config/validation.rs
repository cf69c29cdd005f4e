use crate::config::types::Config;
use crate::ConfigError;

/// Validates a parsed configuration
///
/// Checks value ranges and endpoint URL shapes; returns the first problem
/// found as a `ConfigError`.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.site.url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site.url must not be empty".to_string(),
        ));
    }

    if config.auth.service_account_key_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "auth.service-account-key-path must not be empty".to_string(),
        ));
    }

    if config.checker.concurrency == 0 {
        return Err(ConfigError::Validation(
            "checker.concurrency must be greater than 0".to_string(),
        ));
    }

    if config.checker.cache_ttl_days <= 0 {
        return Err(ConfigError::Validation(
            "checker.cache-ttl-days must be greater than 0".to_string(),
        ));
    }

    if config.checker.retry_attempts == 0 {
        return Err(ConfigError::Validation(
            "checker.retry-attempts must be greater than 0".to_string(),
        ));
    }

    if config.cache.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "cache.directory must not be empty".to_string(),
        ));
    }

    for (name, endpoint) in [
        ("endpoints.search-console", &config.endpoints.search_console),
        ("endpoints.indexing", &config.endpoints.indexing),
    ] {
        let parsed = url::Url::parse(endpoint)
            .map_err(|_| ConfigError::InvalidUrl(format!("{}: {}", name, endpoint)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!("{}: {}", name, endpoint)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{AuthConfig, CacheConfig, CheckerConfig, EndpointsConfig, SiteConfig};

    fn valid_config() -> Config {
        Config {
            site: SiteConfig {
                url: "https://example.com".to_string(),
            },
            auth: AuthConfig {
                service_account_key_path: "./sa.json".to_string(),
            },
            checker: CheckerConfig::default(),
            cache: CacheConfig::default(),
            endpoints: EndpointsConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_site_url_rejected() {
        let mut config = valid_config();
        config.site.url = "  ".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_key_path_rejected() {
        let mut config = valid_config();
        config.auth.service_account_key_path = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = valid_config();
        config.checker.concurrency = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_nonpositive_ttl_rejected() {
        let mut config = valid_config();
        config.checker.cache_ttl_days = 0;
        assert!(validate(&config).is_err());

        config.checker.cache_ttl_days = -3;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_retry_attempts_rejected() {
        let mut config = valid_config();
        config.checker.retry_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut config = valid_config();
        config.endpoints.indexing = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        config.endpoints.indexing = "ftp://example.com".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}
