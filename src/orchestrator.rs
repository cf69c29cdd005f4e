//! Indexing orchestrator - the main run control algorithm
//!
//! One run walks through:
//! 1. canonicalizing the site identity
//! 2. discovering the site's URLs from its sitemaps (zero sitemaps is a
//!    terminal, misconfiguration-class failure)
//! 3. restoring the persisted status cache (best effort)
//! 4. re-checking every URL whose record is missing or stale, in bounded
//!    concurrent batches
//! 5. persisting the whole updated cache, even after partial failures
//! 6. deriving the eligible URL set
//! 7. submitting indexing requests for eligible URLs one at a time,
//!    skipping those already requested
//!
//! Only step 2's empty result and a transport-level failure inside step 4
//! abort a run; everything else is recorded or logged and carried forward.

use crate::batch::run_batched;
use crate::config::Config;
use crate::fetch::{build_http_client, RetryPolicy};
use crate::gsc::{get_page_indexing_status, get_publish_metadata, get_sitemap_pages, request_indexing};
use crate::site::{convert_to_site_url, sanitize_site_url, site_cache_key, site_restore_key};
use crate::status::{bucket_by_status, should_recheck, CoverageState, StatusCache, UrlStatusRecord};
use crate::storage::{load_status_document, save_status_document, CacheStore, FileCacheStore};
use crate::{IndexerError, Result};
use chrono::{Duration, Utc};
use reqwest::Client;
use std::path::PathBuf;

/// What one run did, for reporting and tests
#[derive(Debug, Default)]
pub struct RunReport {
    /// URLs discovered in the site's sitemaps
    pub pages_total: usize,

    /// URLs that needed (and got) a fresh remote status check
    pub pages_checked: usize,

    /// Final per-status buckets for this run's URLs, in sitemap order
    pub buckets: Vec<(CoverageState, Vec<String>)>,

    /// URLs eligible for an indexing request this run
    pub eligible: Vec<String>,

    /// URLs for which a new indexing request was submitted
    pub submitted: Vec<String>,

    /// Eligible URLs skipped because a request already existed
    pub already_requested: Vec<String>,
}

/// Outcome of checking one URL during the batch phase
struct CheckOutcome {
    url: String,
    record: UrlStatusRecord,
    fresh: bool,
}

/// Drives the full indexing workflow for one site
pub struct Orchestrator {
    config: Config,
    client: Client,
    access_token: String,
    site_url: String,
    store: FileCacheStore,
    document_path: PathBuf,
    policy: RetryPolicy,
}

impl Orchestrator {
    /// Creates an orchestrator for the configured site
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `access_token` - Bearer token from the credential exchange
    pub fn new(config: Config, access_token: String) -> Result<Self> {
        let client = build_http_client()?;
        let site_url = convert_to_site_url(&config.site.url);

        let cache_dir = PathBuf::from(&config.cache.directory);
        let document_path = cache_dir.join(format!("{}.json", sanitize_site_url(&site_url)));
        let store = FileCacheStore::new(cache_dir.join("saves"));

        let policy = RetryPolicy {
            max_attempts: config.checker.retry_attempts,
            base_delay: std::time::Duration::from_millis(config.checker.retry_delay_ms),
        };

        Ok(Self {
            config,
            client,
            access_token,
            site_url,
            store,
            document_path,
            policy,
        })
    }

    /// The canonical site URL this orchestrator operates on
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Runs the workflow; with `check_only` the submission phase is skipped
    pub async fn run(&self, check_only: bool) -> Result<RunReport> {
        tracing::info!("🔎 Processing site: {}", self.site_url);

        // Discover URLs; an empty sitemap list means the site is not set up
        let (sitemaps, pages) = get_sitemap_pages(
            &self.client,
            &self.config.endpoints.search_console,
            &self.access_token,
            &self.site_url,
            &self.policy,
        )
        .await?;

        if sitemaps.is_empty() {
            return Err(IndexerError::NoSitemaps {
                site: self.site_url.clone(),
            });
        }
        tracing::info!(
            "👉 Found {} URLs in {} sitemaps",
            pages.len(),
            sitemaps.len()
        );

        // Restore the previous run's cache; a miss just means a cold start
        let restore_key = site_restore_key(&self.site_url);
        let cache_key = site_cache_key(&self.site_url, Utc::now());
        let hit = self
            .store
            .restore(&self.document_path, &cache_key, &[&restore_key])?;
        if hit {
            tracing::info!("👍 Cache hit, using previously cached data");
        } else {
            tracing::info!("👎 Cache miss, fetching data from Search Console");
        }
        let mut cache = load_status_document(&self.document_path)?;

        // Check phase: batched, bounded, fail-fast on transport errors
        let outcomes = self.check_pages(&pages, &cache).await?;

        // Fold results into the cache strictly after the batches finished
        let pages_checked = outcomes.iter().filter(|o| o.fresh).count();
        for outcome in &outcomes {
            cache.insert(outcome.url.clone(), outcome.record.clone());
        }
        let buckets = bucket_by_status(outcomes.iter().map(|o| (&o.url, &o.record)));

        // Persist everything before submissions so partial progress survives
        save_status_document(&self.document_path, &cache)?;
        self.store.save(&self.document_path, &cache_key)?;
        tracing::info!("📦 Cache saved under key {}", cache_key);

        tracing::info!("👍 Done, here's the status of all {} pages:", pages.len());
        for (status, urls) in &buckets {
            tracing::info!("• {} {}: {} pages", status.emoji(), status, urls.len());
        }

        let eligible = eligible_urls(&buckets);

        let mut report = RunReport {
            pages_total: pages.len(),
            pages_checked,
            buckets,
            eligible,
            ..RunReport::default()
        };

        if report.eligible.is_empty() {
            tracing::info!("✨ There are no pages that can be indexed");
            return Ok(report);
        }
        tracing::info!(
            "✨ Found {} pages that can be indexed:",
            report.eligible.len()
        );
        for url in &report.eligible {
            tracing::info!("• {}", url);
        }

        if check_only {
            tracing::info!("Check-only mode, skipping submission");
            return Ok(report);
        }

        // Submission phase: strictly sequential, never run-fatal
        let eligible = report.eligible.clone();
        for url in &eligible {
            self.submit_url(url, &mut report).await;
        }

        Ok(report)
    }

    /// Runs the batched status checks for all URLs needing one
    ///
    /// Cached records that are still trusted are passed through unchanged;
    /// everything else is re-checked remotely. HTTP-level check failures
    /// come back as `Forbidden`/`Error` records; transport-level failures
    /// abort the executor and this run.
    async fn check_pages(&self, pages: &[String], cache: &StatusCache) -> Result<Vec<CheckOutcome>> {
        let ttl = Duration::days(self.config.checker.cache_ttl_days);

        run_batched(
            pages,
            self.config.checker.concurrency,
            |url| {
                let url = url.clone();
                async move {
                    match cache.get(&url) {
                        Some(record)
                            if !should_recheck(
                                &record.status,
                                record.last_checked_at,
                                Utc::now(),
                                ttl,
                            ) =>
                        {
                            Ok(CheckOutcome {
                                url,
                                record: record.clone(),
                                fresh: false,
                            })
                        }
                        _ => {
                            let status = get_page_indexing_status(
                                &self.client,
                                &self.config.endpoints.search_console,
                                &self.access_token,
                                &self.site_url,
                                &url,
                                &self.policy,
                            )
                            .await?;
                            Ok(CheckOutcome {
                                url,
                                record: UrlStatusRecord::checked_now(status),
                                fresh: true,
                            })
                        }
                    }
                }
            },
            |batch_index, batch_count| {
                tracing::info!("📦 Batch {} of {} complete", batch_index + 1, batch_count);
            },
        )
        .await
    }

    /// Resolves one eligible URL: query publish metadata, submit if absent
    ///
    /// Every outcome here is at most a per-URL warning; sibling URLs and the
    /// run as a whole are never affected.
    async fn submit_url(&self, url: &str, report: &mut RunReport) {
        tracing::info!("📄 Processing url: {}", url);

        let metadata_status = match get_publish_metadata(
            &self.client,
            &self.config.endpoints.indexing,
            &self.access_token,
            url,
            &self.policy,
        )
        .await
        {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Skipping {}: publish metadata query failed: {}", url, e);
                return;
            }
        };

        if metadata_status == reqwest::StatusCode::NOT_FOUND {
            match request_indexing(
                &self.client,
                &self.config.endpoints.indexing,
                &self.access_token,
                url,
                &self.policy,
            )
            .await
            {
                Ok(()) => {
                    tracing::info!("🚀 Indexing requested; processing can take a few days");
                    report.submitted.push(url.to_string());
                }
                Err(e) => {
                    tracing::warn!("Indexing request for {} failed: {}", url, e);
                }
            }
        } else if metadata_status.as_u16() < 400 {
            tracing::info!("🕛 Indexing already requested previously");
            report.already_requested.push(url.to_string());
        } else {
            tracing::warn!(
                "Unexpected publish metadata status {} for {}",
                metadata_status,
                url
            );
        }
    }
}

/// Flattens the indexable buckets into the eligible URL list, keeping order
fn eligible_urls(buckets: &[(CoverageState, Vec<String>)]) -> Vec<String> {
    buckets
        .iter()
        .filter(|(status, _)| status.is_indexable())
        .flat_map(|(_, urls)| urls.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_urls_filters_and_flattens() {
        let buckets = vec![
            (
                CoverageState::SubmittedAndIndexed,
                vec!["https://example.com/indexed".to_string()],
            ),
            (
                CoverageState::DiscoveredNotIndexed,
                vec![
                    "https://example.com/new-1".to_string(),
                    "https://example.com/new-2".to_string(),
                ],
            ),
            (
                CoverageState::Error,
                vec!["https://example.com/broken".to_string()],
            ),
        ];

        let eligible = eligible_urls(&buckets);

        assert_eq!(
            eligible,
            vec![
                "https://example.com/new-1",
                "https://example.com/new-2",
                "https://example.com/broken",
            ]
        );
    }

    #[test]
    fn test_eligible_urls_empty_when_everything_indexed() {
        let buckets = vec![(
            CoverageState::SubmittedAndIndexed,
            vec!["https://example.com/".to_string()],
        )];
        assert!(eligible_urls(&buckets).is_empty());
    }
}
