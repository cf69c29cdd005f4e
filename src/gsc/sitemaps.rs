//! Sitemap discovery
//!
//! Resolves a site to its flat URL list: the Search Console sitemap list API
//! names the sitemaps submitted for the property, each sitemap document is
//! fetched, and `<loc>` entries are extracted. Sitemap-index documents are
//! followed one level deep.

use crate::fetch::{send_with_retry, RetryPolicy};
use crate::{IndexerError, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct SitemapList {
    #[serde(default)]
    sitemap: Vec<SitemapEntry>,
}

#[derive(Debug, Deserialize)]
struct SitemapEntry {
    path: String,
}

/// Extracted `<loc>` values of a single sitemap document
struct SitemapLocs {
    /// Nested sitemap locations (`<sitemap><loc>` entries of an index)
    nested: Vec<String>,
    /// Page locations (`<url><loc>` entries)
    pages: Vec<String>,
}

/// Pulls `<loc>` entries out of a sitemap or sitemap-index document
fn parse_sitemap_locs(xml: &str) -> SitemapLocs {
    let doc = Html::parse_document(xml);
    let text_of = |el: scraper::ElementRef<'_>| el.text().collect::<String>().trim().to_string();

    let mut locs = SitemapLocs {
        nested: Vec::new(),
        pages: Vec::new(),
    };
    if let Ok(nested_sel) = Selector::parse("sitemap loc") {
        locs.nested = doc.select(&nested_sel).map(text_of).collect();
    }
    if let Ok(page_sel) = Selector::parse("url loc") {
        locs.pages = doc.select(&page_sel).map(text_of).collect();
    }
    locs
}

/// Fetches one sitemap document and returns its extracted locations
async fn fetch_sitemap(client: &Client, url: &str, policy: &RetryPolicy) -> Result<SitemapLocs> {
    let response = send_with_retry(|| client.get(url), policy)
        .await
        .map_err(|e| IndexerError::Http {
            url: url.to_string(),
            source: e,
        })?;

    if !response.status().is_success() {
        tracing::warn!("Sitemap {} returned HTTP {}", url, response.status());
        return Ok(SitemapLocs {
            nested: Vec::new(),
            pages: Vec::new(),
        });
    }

    let body = response.text().await?;
    Ok(parse_sitemap_locs(&body))
}

/// Discovers the sitemaps registered for a site and the URLs they contain
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `search_console_base` - Search Console API base URL
/// * `access_token` - Bearer token for the sitemap list API
/// * `site_url` - Canonical site URL (see [`crate::site::convert_to_site_url`])
///
/// # Returns
///
/// `(sitemap_list, url_list)`; the URL list is deduplicated and keeps
/// discovery order. An empty sitemap list is the caller's terminal-failure
/// trigger, not an error here.
pub async fn get_sitemap_pages(
    client: &Client,
    search_console_base: &str,
    access_token: &str,
    site_url: &str,
    policy: &RetryPolicy,
) -> Result<(Vec<String>, Vec<String>)> {
    let encoded_site: String = url::form_urlencoded::byte_serialize(site_url.as_bytes()).collect();
    let endpoint = format!(
        "{}/webmasters/v3/sites/{}/sitemaps",
        search_console_base, encoded_site
    );

    let response = send_with_retry(|| client.get(&endpoint).bearer_auth(access_token), policy)
        .await
        .map_err(|e| IndexerError::Http {
            url: endpoint.clone(),
            source: e,
        })?;

    if !response.status().is_success() {
        return Err(IndexerError::Auth(format!(
            "sitemap list request failed with HTTP {}",
            response.status()
        )));
    }

    let list: SitemapList = response.json().await?;
    let sitemaps: Vec<String> = list.sitemap.into_iter().map(|s| s.path).collect();

    let mut seen = HashSet::new();
    let mut pages = Vec::new();
    let mut add_pages = |locs: Vec<String>, pages: &mut Vec<String>| {
        for url in locs {
            if seen.insert(url.clone()) {
                pages.push(url);
            }
        }
    };

    for sitemap_url in &sitemaps {
        let locs = fetch_sitemap(client, sitemap_url, policy).await?;
        add_pages(locs.pages, &mut pages);

        // One level of sitemap-index recursion
        for nested_url in locs.nested {
            let nested = fetch_sitemap(client, &nested_url, policy).await?;
            add_pages(nested.pages, &mut pages);
        }
    }

    Ok((sitemaps, pages))
}
