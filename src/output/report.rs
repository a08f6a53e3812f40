//! End-of-run reporting
//!
//! This module renders the crawl summary printed when a run completes and
//! the per-status counts shown by the `--stats` mode.

use crate::storage::StatusCounts;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Summary of a completed crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the full fan-out tree resolved
    pub finished_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Ledger counts at the end of the run
    pub counts: StatusCounts,
}

/// Prints the end-of-run summary
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Complete ===");
    println!(
        "Started:  {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "Finished: {}",
        report.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Total time taken: {:.2}s", report.elapsed.as_secs_f64());
    println!();
    print_ledger_stats(&report.counts);
}

/// Prints per-status ledger counts
pub fn print_ledger_stats(counts: &StatusCounts) {
    println!("URLs recorded: {}", counts.total());
    println!("  success: {}", counts.success);
    println!("  failed:  {}", counts.failed);
    if counts.pending > 0 {
        println!("  pending: {} (interrupted run)", counts.pending);
    }
}
