//! gsc-indexer main entry point
//!
//! This is the command-line interface for the gsc-indexer bulk indexing tool.

use anyhow::Context;
use clap::Parser;
use gsc_indexer::auth::{get_access_token, ServiceAccountKey};
use gsc_indexer::config::load_config_with_hash;
use gsc_indexer::fetch::build_http_client;
use gsc_indexer::Orchestrator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// gsc-indexer: bulk indexing requests for a site
///
/// gsc-indexer enumerates a site's URLs from its sitemaps registered in
/// Google Search Console, checks which ones are not indexed yet, and
/// submits indexing requests for them without double-submitting.
#[derive(Parser, Debug)]
#[command(name = "gsc-indexer")]
#[command(version = "1.0.0")]
#[command(about = "Bulk Google indexing requests driven by Search Console", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be processed without any requests
    #[arg(long, conflicts_with_all = ["status", "check_only"])]
    dry_run: bool,

    /// Show the cached per-URL statuses and exit
    #[arg(long, conflicts_with_all = ["dry_run", "check_only"])]
    status: bool,

    /// Check indexing statuses but skip the submission phase
    #[arg(long, conflicts_with_all = ["dry_run", "status"])]
    check_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.status {
        handle_status(&config)?;
    } else {
        handle_run(config, cli.check_only).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gsc_indexer=info,warn"),
            1 => EnvFilter::new("gsc_indexer=debug,info"),
            2 => EnvFilter::new("gsc_indexer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would happen
fn handle_dry_run(config: &gsc_indexer::Config) {
    println!("=== gsc-indexer Dry Run ===\n");

    println!("Site:");
    println!("  Configured: {}", config.site.url);
    println!(
        "  Canonical:  {}",
        gsc_indexer::convert_to_site_url(&config.site.url)
    );

    println!("\nAuthentication:");
    println!(
        "  Service account key: {}",
        config.auth.service_account_key_path
    );

    println!("\nChecker:");
    println!("  Concurrency: {}", config.checker.concurrency);
    println!("  Cache TTL: {} days", config.checker.cache_ttl_days);
    println!("  Retry attempts: {}", config.checker.retry_attempts);
    println!("  Retry delay: {}ms", config.checker.retry_delay_ms);

    println!("\nCache:");
    println!("  Directory: {}", config.cache.directory);

    println!("\nEndpoints:");
    println!("  Search Console: {}", config.endpoints.search_console);
    println!("  Indexing API: {}", config.endpoints.indexing);

    println!("\n✓ Configuration is valid");
    println!("✓ Would check sitemaps and request indexing for eligible URLs");
}

/// Handles the --status mode: prints the cached statuses and exits
fn handle_status(config: &gsc_indexer::Config) -> anyhow::Result<()> {
    use gsc_indexer::site::sanitize_site_url;
    use gsc_indexer::status::bucket_by_status;
    use gsc_indexer::storage::load_status_document;

    let site_url = gsc_indexer::convert_to_site_url(&config.site.url);
    let document_path = PathBuf::from(&config.cache.directory)
        .join(format!("{}.json", sanitize_site_url(&site_url)));

    println!("Site: {}", site_url);
    println!("Cache: {}\n", document_path.display());

    let cache = load_status_document(&document_path)?;
    if cache.is_empty() {
        println!("No cached statuses yet, run the checker first");
        return Ok(());
    }

    let buckets = bucket_by_status(cache.iter());
    println!("Cached status of {} pages:", cache.len());
    for (status, urls) in &buckets {
        println!("• {} {}: {} pages", status.emoji(), status, urls.len());
    }

    Ok(())
}

/// Handles the main indexing run
async fn handle_run(config: gsc_indexer::Config, check_only: bool) -> anyhow::Result<()> {
    if check_only {
        tracing::info!("Check-only mode: statuses will be refreshed, nothing submitted");
    }

    // Exchange the service account credential for an access token
    let client = build_http_client()?;
    let key_path = PathBuf::from(&config.auth.service_account_key_path);
    let key = ServiceAccountKey::from_file(&key_path)
        .with_context(|| format!("failed to load service account key from {}", key_path.display()))?;
    let access_token = get_access_token(&client, &key).await?;
    tracing::info!("🔑 Authenticated as {}", key.client_email);

    let orchestrator = Orchestrator::new(config, access_token)?;
    match orchestrator.run(check_only).await {
        Ok(report) => {
            tracing::info!(
                "Run complete: {} pages, {} checked, {} submitted, {} already requested",
                report.pages_total,
                report.pages_checked,
                report.submitted.len(),
                report.already_requested.len()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
