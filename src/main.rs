//! Gleaner main entry point
//!
//! This is the command-line interface for the Gleaner domain-scoped crawler.

use anyhow::Context;
use clap::Parser;
use gleaner::config::load_config_with_hash;
use gleaner::crawler::crawl;
use gleaner::output::{print_ledger_stats, print_report};
use gleaner::storage::VisitLedger;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gleaner: a domain-scoped text-harvesting crawler
///
/// Gleaner crawls every page reachable within one host, extracts the
/// primary text of each page for downstream retrieval pipelines, saves
/// PDF documents, and records a resumable per-URL visitation ledger.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A domain-scoped text-harvesting crawler", long_about = None)]
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

    /// Resume an interrupted crawl (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, ignoring previous state
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show per-status counts from the ledger file and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, cli.fresh).await?;
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
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &gleaner::config::Config) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    if config.crawler.skip_substrings.is_empty() {
        println!("  Skip list: (empty)");
    } else {
        println!("  Skip list:");
        for pattern in &config.crawler.skip_substrings {
            println!("    - {}", pattern);
        }
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    println!("  Status file: {}", config.output.status_file);
    println!("  External links: {}", config.output.external_links_file);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling from {}", config.crawler.seed_url);
}

/// Handles the --stats mode: shows per-status counts from the ledger
fn handle_stats(config: &gleaner::config::Config) -> anyhow::Result<()> {
    let status_path = std::path::Path::new(&config.output.status_file);
    println!("Ledger: {}\n", status_path.display());

    let counts = VisitLedger::load_counts(status_path)
        .with_context(|| format!("Failed to read ledger {}", status_path.display()))?;
    print_ledger_stats(&counts);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: gleaner::config::Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (will resume if a previous ledger exists)");
    }

    match crawl(config, fresh).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
