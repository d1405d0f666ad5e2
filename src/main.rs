//! Gleaner main entry point
//!
//! Command-line interface for the periodic listing harvester.

use anyhow::Context;
use clap::Parser;
use gleaner::config::{load_config_with_hash, SearchConfig};
use gleaner::fetch::HttpFetcher;
use gleaner::harvest::{FetchOrchestrator, Pacing, TickScheduler};
use gleaner::normalize::ListingNormalizer;
use gleaner::storage::{ListingStore, SqliteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Gleaner: a periodic listing harvester
///
/// Polls a configured set of listing sources on a fixed interval, normalizes
/// what it finds, and records new entries without duplicates.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A periodic listing harvester", long_about = None)]
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

    /// Run a single harvest pass and exit instead of scheduling
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    once: bool,

    /// Validate config and show what would be polled without fetching
    #[arg(long, conflicts_with_all = ["once", "stats"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["once", "dry_run"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) =
        load_config_with_hash(&cli.config).context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.stats {
        return handle_stats(&config);
    }

    let store = Arc::new(
        SqliteStore::new(Path::new(&config.database_path))
            .context("Failed to open listing database")?,
    );
    let fetcher = Arc::new(
        HttpFetcher::new(config.crawler.clone()).context("Failed to build fetcher")?,
    );
    let normalizer = Arc::new(ListingNormalizer::new());

    let orchestrator = FetchOrchestrator::new(
        fetcher,
        normalizer,
        store,
        Pacing::default_inter_source(),
    );

    if cli.once {
        tracing::info!("Running a single harvest pass");
        orchestrator.run_all(&config).await;
        return Ok(());
    }

    run_scheduled(orchestrator, config).await
}

/// Starts the scheduler and blocks until an interrupt arrives
async fn run_scheduled(
    orchestrator: FetchOrchestrator,
    config: SearchConfig,
) -> anyhow::Result<()> {
    tracing::info!(
        "Starting scheduler: {} sources every {} minutes ({})",
        config.groups.len(),
        config.interval,
        if config.multithreaded {
            "concurrent"
        } else {
            "sequential"
        }
    );

    let scheduler = TickScheduler::new(orchestrator, Arc::new(config));
    let handle = scheduler.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for interrupt signal")?;

    tracing::info!("Shutting down listing harvester");
    handle.stop().await;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the polling plan
fn handle_dry_run(config: &SearchConfig) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Schedule:");
    println!("  Interval: {} minutes", config.interval);
    println!("  Pages per source: {}", config.pages);
    println!(
        "  Mode: {}",
        if config.multithreaded {
            "concurrent"
        } else {
            "sequential"
        }
    );

    println!("\nFetcher:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nDatabase: {}", config.database_path);

    println!("\nSources ({}):", config.groups.len());
    for group in &config.groups {
        println!("  - {}", group);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &SearchConfig) -> anyhow::Result<()> {
    let store = SqliteStore::new(Path::new(&config.database_path))
        .context("Failed to open listing database")?;

    println!("Database: {}\n", config.database_path);
    println!("Total entries: {}", store.count_entries()?);

    let by_source = store.count_by_source()?;
    if !by_source.is_empty() {
        println!("\nEntries per source:");
        for (source, count) in by_source {
            println!("  {:30} {}", source, count);
        }
    }

    let recent = store.recent_entries(5)?;
    if !recent.is_empty() {
        println!("\nMost recent entries:");
        for entry in recent {
            let text: String = entry.text.chars().take(60).collect();
            println!("  [{}] {} ({})", entry.first_seen_at, text, entry.source);
        }
    }

    Ok(())
}
