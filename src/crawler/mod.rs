//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching for pages and binary documents
//! - HTML link extraction and boilerplate-stripping text extraction
//! - The orchestrator driving the recursive, ledger-gated crawl

mod extractor;
mod fetcher;
mod orchestrator;
mod parser;

pub use extractor::extract_text;
pub use fetcher::{build_http_client, fetch_binary, fetch_page, FetchResult};
pub use orchestrator::{run_crawl, Orchestrator};
pub use parser::{parse_page, ParsedPage};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Load or create the visitation ledger
/// 2. Build the HTTP client
/// 3. Claim and visit the seed URL, fanning out to discovered links
/// 4. Return the end-of-run report once the full tree has resolved
pub async fn crawl(config: Config, fresh: bool) -> Result<CrawlReport> {
    run_crawl(config, fresh).await
}
