//! Site identity handling
//!
//! Search Console knows two property kinds: URL-prefix properties
//! (`https://example.com/`, trailing slash required) and domain properties
//! (`sc-domain:example.com`). Everything downstream, from API paths to the
//! cache key the persisted status document is stored under, is derived from
//! the canonical site URL produced here.

/// Converts user input into the canonical Search Console site URL
///
/// Input starting with `http://` or `https://` is treated as a URL-prefix
/// property and gets a trailing slash if missing; anything else is treated
/// as a domain property and prefixed with `sc-domain:`.
pub fn convert_to_site_url(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        if input.ends_with('/') {
            input.to_string()
        } else {
            format!("{}/", input)
        }
    } else {
        format!("sc-domain:{}", input)
    }
}

/// Derives the sanitized, filesystem- and key-safe identity for a site
///
/// Used both as the cache document file name and inside the save keys in
/// the blob store. Distinct sites produce distinct sanitized names, but one
/// site's name can be a string prefix of another's (nested URL-prefix
/// properties), which is why [`site_restore_key`] carries its own
/// terminating separator.
pub fn sanitize_site_url(site_url: &str) -> String {
    site_url
        .replace("http://", "http_")
        .replace("https://", "https_")
        .replace(':', "_")
        .replace('/', "_")
}

/// The store key prefix under which all saves for this site live
///
/// Restoring with this prefix as a fallback key picks up the most recent
/// prior run's cache for the same site. The prefix ends with the key
/// separator so a nested URL-prefix property (`https://example.com/blog/`)
/// never matches the parent property's prefix.
pub fn site_restore_key(site_url: &str) -> String {
    format!("gsc-indexer-{}-", sanitize_site_url(site_url))
}

/// A per-run unique save key: restore prefix plus a millisecond timestamp
pub fn site_cache_key(site_url: &str, now: chrono::DateTime<chrono::Utc>) -> String {
    format!("{}{}", site_restore_key(site_url), now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_prefix_property_gets_trailing_slash() {
        assert_eq!(
            convert_to_site_url("https://example.com"),
            "https://example.com/"
        );
        assert_eq!(
            convert_to_site_url("http://example.com/blog"),
            "http://example.com/blog/"
        );
    }

    #[test]
    fn test_url_prefix_property_keeps_existing_slash() {
        assert_eq!(
            convert_to_site_url("https://example.com/"),
            "https://example.com/"
        );
    }

    #[test]
    fn test_domain_property() {
        assert_eq!(convert_to_site_url("example.com"), "sc-domain:example.com");
        assert_eq!(
            convert_to_site_url("sub.example.com"),
            "sc-domain:sub.example.com"
        );
    }

    #[test]
    fn test_sanitize_site_url() {
        assert_eq!(
            sanitize_site_url("https://example.com/"),
            "https_example.com_"
        );
        assert_eq!(
            sanitize_site_url("sc-domain:example.com"),
            "sc-domain_example.com"
        );
    }

    #[test]
    fn test_restore_key_scoped_per_site() {
        let a = site_restore_key("https://a.example.com/");
        let b = site_restore_key("https://b.example.com/");
        assert_ne!(a, b);
        assert!(a.starts_with("gsc-indexer-"));
    }

    #[test]
    fn test_nested_property_keys_do_not_cross_match() {
        // https://example.com/ sanitizes to a string prefix of the nested
        // blog property; the separator keeps their key spaces apart
        let now = chrono::Utc::now();
        let parent_prefix = site_restore_key("https://example.com/");
        let nested_key = site_cache_key("https://example.com/blog/", now);

        assert!(!nested_key.starts_with(&parent_prefix));
        assert!(!site_cache_key("https://example.com/", now)
            .starts_with(&site_restore_key("https://example.com/blog/")));
    }

    #[test]
    fn test_cache_key_unique_per_run() {
        let now = chrono::Utc::now();
        let later = now + chrono::Duration::milliseconds(5);
        let site = "https://example.com/";

        let key_now = site_cache_key(site, now);
        let key_later = site_cache_key(site, later);

        assert_ne!(key_now, key_later);
        assert!(key_now.starts_with(&site_restore_key(site)));
    }
}
