//! Indexing API: publish metadata lookup and indexing submission

use crate::fetch::{send_with_retry, RetryPolicy};
use crate::{IndexerError, Result};
use reqwest::{Client, StatusCode};

/// Queries publish metadata for a URL
///
/// Only the HTTP status matters to the caller: 404 means no indexing
/// request exists yet, anything below 400 means one was already made.
/// Server errors are logged here but classification is the orchestrator's
/// job.
pub async fn get_publish_metadata(
    client: &Client,
    indexing_base: &str,
    access_token: &str,
    url: &str,
    policy: &RetryPolicy,
) -> Result<StatusCode> {
    let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
    let endpoint = format!("{}/v3/urlNotifications/metadata?url={}", indexing_base, encoded);

    let response = send_with_retry(|| client.get(&endpoint).bearer_auth(access_token), policy)
        .await
        .map_err(|e| IndexerError::Http {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();

    if status == StatusCode::FORBIDDEN {
        tracing::error!("🔐 Service account has no access to this site (URL: {})", url);
        tracing::error!("Response was: {}", status);
    } else if status.as_u16() >= 500 {
        tracing::error!("❌ Failed to get publish metadata for {}", url);
        tracing::error!("Response was: {}", status);
        tracing::error!("{}", response.text().await.unwrap_or_default());
    }

    Ok(status)
}

/// Submits an indexing request for a URL
///
/// Fire-and-forget from the orchestrator's perspective; the response is
/// only inspected for logging.
pub async fn request_indexing(
    client: &Client,
    indexing_base: &str,
    access_token: &str,
    url: &str,
    policy: &RetryPolicy,
) -> Result<()> {
    let endpoint = format!("{}/v3/urlNotifications:publish", indexing_base);
    let body = serde_json::json!({
        "url": url,
        "type": "URL_UPDATED",
    });

    let response = send_with_retry(
        || client.post(&endpoint).bearer_auth(access_token).json(&body),
        policy,
    )
    .await
    .map_err(|e| IndexerError::Http {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();

    if status == StatusCode::FORBIDDEN {
        tracing::error!("🔐 Service account has no access to this site (URL: {})", url);
        tracing::error!("Response was: {}", status);
    } else if status.as_u16() >= 300 {
        tracing::error!("❌ Failed to request indexing for {}", url);
        tracing::error!("Response was: {}", status);
        tracing::error!("{}", response.text().await.unwrap_or_default());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::build_http_client;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_metadata_status_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/urlNotifications/metadata"))
            .and(query_param("url", "https://example.com/a"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let status = get_publish_metadata(
            &client,
            &server.uri(),
            "tok",
            "https://example.com/a",
            &fast_policy(),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_indexing_posts_url_updated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/urlNotifications:publish"))
            .and(header("authorization", "Bearer tok"))
            .and(body_partial_json(serde_json::json!({
                "url": "https://example.com/a",
                "type": "URL_UPDATED",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "urlNotificationMetadata": { "url": "https://example.com/a" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        request_indexing(
            &client,
            &server.uri(),
            "tok",
            "https://example.com/a",
            &fast_policy(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_request_indexing_failure_is_not_an_error() {
        // The response is only logged; HTTP-level failure never bubbles up
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/urlNotifications:publish"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
            .mount(&server)
            .await;

        let client = build_http_client().unwrap();
        let result = request_indexing(
            &client,
            &server.uri(),
            "tok",
            "https://example.com/a",
            &fast_policy(),
        )
        .await;

        assert!(result.is_ok());
    }
}
