//! Crawl orchestration: the per-URL state machine and recursive fan-out
//!
//! This module drives the crawl. For each URL it claims the ledger entry,
//! fetches the page, dispatches by content kind, persists extracted content,
//! and recursively schedules unvisited in-domain children. Recursion is
//! bounded only by the domain and the ledger: a URL with no new links is a
//! leaf, and the crawl completes when the seed's full fan-out tree resolves.

use crate::config::Config;
use crate::crawler::extractor::extract_text;
use crate::crawler::fetcher::{build_http_client, fetch_binary, fetch_page, FetchResult};
use crate::crawler::parser::parse_page;
use crate::output::{ContentSink, CrawlReport};
use crate::state::VisitStatus;
use crate::storage::VisitLedger;
use crate::url::{matches_skip_list, DomainFilter};
use crate::{GleanerError, Result};
use chrono::Utc;
use reqwest::Client;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Main crawl orchestrator
///
/// Holds the shared pieces every crawl task needs: the HTTP client, the
/// ledger, the domain filter, and the content sink. The orchestrator is
/// wrapped in an `Arc` and cloned into each spawned task.
pub struct Orchestrator {
    config: Config,
    client: Client,
    ledger: VisitLedger,
    filter: DomainFilter,
    sink: ContentSink,
    // Caps simultaneously in-flight HTTP requests; held only around I/O
    fetch_permits: Semaphore,
}

impl Orchestrator {
    /// Creates a new orchestrator from a validated configuration
    ///
    /// With `fresh` set, any previous status file is removed so the ledger
    /// starts empty; otherwise the ledger is loaded and terminal URLs from
    /// the previous run are never re-fetched.
    pub fn new(config: Config, fresh: bool) -> Result<Self> {
        let seed = Url::parse(&config.crawler.seed_url)?;
        let filter = DomainFilter::for_seed(&seed)?;

        let status_path = Path::new(&config.output.status_file);
        if fresh && status_path.exists() {
            tracing::info!("Removing previous status file {}", status_path.display());
            std::fs::remove_file(status_path)?;
        }
        let ledger = VisitLedger::load(status_path)?;

        let sink = ContentSink::new(
            Path::new(&config.output.data_dir),
            Path::new(&config.output.external_links_file),
        )?;

        let client = build_http_client(&config.user_agent)?;
        let fetch_permits = Semaphore::new(config.crawler.max_concurrent_fetches as usize);

        Ok(Self {
            config,
            client,
            ledger,
            filter,
            sink,
            fetch_permits,
        })
    }

    /// Read access to the ledger, used by reporting and tests
    pub fn ledger(&self) -> &VisitLedger {
        &self.ledger
    }

    /// Runs the crawl to completion
    ///
    /// Returns only after the entire reachable in-domain graph has been
    /// processed. The returned report carries wall-clock timing and final
    /// per-status ledger counts.
    pub async fn run(self: Arc<Self>) -> Result<CrawlReport> {
        let seed = Url::parse(&self.config.crawler.seed_url)?;
        let started_at = Utc::now();
        let start = Instant::now();

        tracing::info!(
            "Starting crawl of {} (domain: {})",
            seed,
            self.filter.authority()
        );

        Arc::clone(&self).visit(seed).await;

        // A fully resumed crawl claims nothing; write the ledger anyway so
        // the status file always reflects this run's view.
        self.ledger.persist()?;

        let report = CrawlReport {
            started_at,
            finished_at: Utc::now(),
            elapsed: start.elapsed(),
            counts: self.ledger.counts(),
        };

        tracing::info!(
            "Crawl completed: {} URLs recorded in {:.2}s",
            report.counts.total(),
            report.elapsed.as_secs_f64()
        );

        Ok(report)
    }

    /// Processes one URL and its subtree
    ///
    /// Returns a boxed future because the recursion flows through spawned
    /// child tasks. The claim is the first thing that happens; losing it
    /// means another task owns this URL (or a previous run finished it)
    /// and this call returns immediately.
    fn visit(self: Arc<Self>, url: Url) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async move {
            if !self.ledger.claim(url.as_str()) {
                return;
            }

            tracing::info!("Visiting: {}", url);

            // PDFs take the dedicated binary path, decided by URL path
            // alone; the response content type is never consulted.
            if url.path().to_lowercase().ends_with(".pdf") {
                self.download_pdf(&url).await;
                return;
            }

            let fetched = {
                let _permit = match self.fetch_permits.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                fetch_page(&self.client, &url).await
            };

            let (content_type, body) = match fetched {
                FetchResult::Success {
                    content_type, body, ..
                } => (content_type, body),
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("Fetch of {} failed: HTTP {}", url, status_code);
                    self.ledger.finalize(url.as_str(), VisitStatus::Failed);
                    self.persist_ledger();
                    return;
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!("Fetch of {} failed: {}", url, error);
                    self.ledger.finalize(url.as_str(), VisitStatus::Failed);
                    self.persist_ledger();
                    return;
                }
            };

            self.ledger.finalize(url.as_str(), VisitStatus::Success);

            // A processing failure is caught per page: the fetch already
            // succeeded, so the status stays success and only this page's
            // subtree goes unexplored.
            let children = match self.process_page(&url, &content_type, &body) {
                Ok(children) => children,
                Err(e) => {
                    tracing::error!("Error while processing {}: {}", url, e);
                    Vec::new()
                }
            };

            let mut subtree = JoinSet::new();
            for child in children {
                subtree.spawn(Arc::clone(&self).visit(child));
            }
            while let Some(joined) = subtree.join_next().await {
                if let Err(e) = joined {
                    tracing::error!("Crawl task for a child of {} panicked: {}", url, e);
                }
            }

            // The delay sits after the whole subtree, not per request, so
            // it does not bound the peak in-flight request count.
            tokio::time::sleep(Duration::from_millis(self.config.crawler.request_delay_ms)).await;
            self.persist_ledger();
        })
    }

    /// Extracts, persists, and partitions one successfully fetched page
    ///
    /// Returns the in-domain child links that survive the skip list.
    fn process_page(&self, url: &Url, content_type: &str, body: &str) -> Result<Vec<Url>> {
        if !content_type.is_empty() && !content_type.contains("text/html") {
            tracing::debug!(
                "Treating {} response from {} as a page",
                content_type,
                url
            );
        }

        let parsed = parse_page(body, url).map_err(|message| GleanerError::HtmlParse {
            url: url.to_string(),
            message,
        })?;

        if let Some(title) = &parsed.title {
            tracing::debug!("Page title for {}: {}", url, title);
        }

        let partition = self.filter.partition(parsed.links);
        for external in &partition.external {
            self.sink.log_external(external)?;
        }

        let text = extract_text(body);
        self.sink.write_text(url, &text)?;
        tracing::debug!("Saved {} bytes of text for {}", text.len(), url);

        let children = partition
            .in_domain
            .into_iter()
            .filter(|child| {
                if matches_skip_list(child, &self.config.crawler.skip_substrings) {
                    tracing::debug!("Skipping {} (skip list)", child);
                    false
                } else {
                    true
                }
            })
            .collect();

        Ok(children)
    }

    /// Downloads and persists a PDF document
    ///
    /// This is a leaf in the crawl tree: no links are extracted from PDFs.
    async fn download_pdf(&self, url: &Url) {
        let fetched = {
            let _permit = match self.fetch_permits.acquire().await {
                Ok(permit) => permit,
                Err(_) => return,
            };
            fetch_binary(&self.client, url).await
        };

        match fetched {
            Ok(bytes) => match self.sink.write_pdf(url, &bytes) {
                Ok(path) => {
                    tracing::info!("Saved PDF {} to {}", url, path.display());
                    self.ledger.finalize(url.as_str(), VisitStatus::Success);
                }
                Err(e) => {
                    tracing::error!("Failed to save PDF {}: {}", url, e);
                    self.ledger.finalize(url.as_str(), VisitStatus::Failed);
                }
            },
            Err(reason) => {
                tracing::warn!("Failed to download PDF {}: {}", url, reason);
                self.ledger.finalize(url.as_str(), VisitStatus::Failed);
            }
        }

        self.persist_ledger();
    }

    /// Persists the ledger, downgrading failures to an error log
    ///
    /// A failed persist must not take down sibling branches; the next
    /// page to finish will try again with a superset of this state.
    fn persist_ledger(&self) {
        if let Err(e) = self.ledger.persist() {
            tracing::error!("Failed to persist ledger: {}", e);
        }
    }
}

/// Runs the main crawl operation
///
/// This function wires up the orchestrator and drives it to completion:
///
/// 1. Load the ledger (or clear it for a fresh crawl)
/// 2. Build the HTTP client and content sink
/// 3. Claim and visit the seed URL, fanning out over discovered links
/// 4. Persist the final ledger and return the run report
pub async fn run_crawl(config: Config, fresh: bool) -> Result<CrawlReport> {
    let orchestrator = Arc::new(Orchestrator::new(config, fresh)?);
    orchestrator.run().await
}
