//! Resilient HTTP fetch
//!
//! Wraps a single request with bounded retry: transient failures (transport
//! errors, HTTP 429 and 5xx) are retried a few times with an incremental
//! delay, while deterministic client errors are returned as-is for the
//! caller to interpret. After the attempt budget is exhausted, the last
//! response or transport error is surfaced unchanged.
//!
//! This module is stateless; callers decide what a given final status means.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Retry behavior for a single logical request
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first (never 0)
    pub max_attempts: u32,

    /// Base delay between attempts; attempt N waits N times this
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt after `attempt` attempts have been made
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Returns true for response statuses worth retrying
///
/// 429 and 5xx are transient; all other non-success statuses are
/// deterministic and must be surfaced to the caller immediately.
fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Builds the HTTP client shared by all remote calls
///
/// Each request carries its own timeout so a stuck attempt cannot hang a
/// run indefinitely.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("gsc-indexer/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a request, retrying transient failures per `policy`
///
/// `build` is invoked once per attempt to produce a fresh request, so bodies
/// never need to be cloneable across retries.
///
/// # Returns
///
/// * `Ok(Response)` - The final response, which may still be a non-success
///   status; the caller classifies it
/// * `Err(reqwest::Error)` - The last transport-level error after the
///   attempt budget ran out
pub async fn send_with_retry<F>(
    build: F,
    policy: &RetryPolicy,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 1;

    loop {
        match build().send().await {
            Ok(response) if is_transient(response.status()) && attempt < policy.max_attempts => {
                tracing::warn!(
                    "Transient HTTP {} (attempt {}/{}), retrying",
                    response.status(),
                    attempt,
                    policy.max_attempts
                );
            }
            Ok(response) => return Ok(response),
            Err(e) if attempt < policy.max_attempts => {
                tracing::warn!(
                    "Transport error (attempt {}/{}): {}, retrying",
                    attempt,
                    policy.max_attempts,
                    e
                );
            }
            Err(e) => return Err(e),
        }

        tokio::time::sleep(policy.delay_after(attempt)).await;
        attempt += 1;
    }
}
