//! URL inspection: what does Search Console think of this page?

use crate::fetch::{send_with_retry, RetryPolicy};
use crate::status::CoverageState;
use crate::{IndexerError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectionResponse {
    inspection_result: InspectionResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectionResult {
    index_status_result: IndexStatusResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStatusResult {
    coverage_state: String,
}

/// Checks the indexing coverage state of a single URL
///
/// Failure mapping:
/// - HTTP 403 ⇒ `CoverageState::Forbidden` (the service account lacks access
///   to this site; recorded, not fatal)
/// - any other non-success status after retries ⇒ `CoverageState::Error`
///   (recorded, not fatal)
/// - transport-level failure after retries ⇒ `Err` (aborts the whole check
///   phase)
pub async fn get_page_indexing_status(
    client: &Client,
    search_console_base: &str,
    access_token: &str,
    site_url: &str,
    inspection_url: &str,
    policy: &RetryPolicy,
) -> Result<CoverageState> {
    let endpoint = format!("{}/v1/urlInspection/index:inspect", search_console_base);
    let body = serde_json::json!({
        "inspectionUrl": inspection_url,
        "siteUrl": site_url,
    });

    let response = send_with_retry(
        || client.post(&endpoint).bearer_auth(access_token).json(&body),
        policy,
    )
    .await
    .map_err(|e| IndexerError::Http {
        url: inspection_url.to_string(),
        source: e,
    })?;

    let status = response.status();

    if status == StatusCode::FORBIDDEN {
        tracing::error!(
            "🔐 Service account has no access to this site (URL: {})",
            inspection_url
        );
        tracing::error!("Response was: {}", response.text().await.unwrap_or_default());
        return Ok(CoverageState::Forbidden);
    }

    if status.as_u16() >= 300 {
        tracing::error!("❌ Failed to get indexing status for {}", inspection_url);
        tracing::error!("Response was: {}", status);
        tracing::error!("{}", response.text().await.unwrap_or_default());
        return Ok(CoverageState::Error);
    }

    let parsed: InspectionResponse = response.json().await?;
    Ok(CoverageState::from(
        parsed.inspection_result.index_status_result.coverage_state,
    ))
}
