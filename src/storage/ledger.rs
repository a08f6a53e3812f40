//! Visitation ledger backed by a JSON status file
//!
//! This module implements the single source of truth for "has this URL been
//! handled". All deduplication rests on `claim` being one indivisible
//! check-and-set under the ledger mutex.

use crate::state::VisitStatus;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Per-status entry counts, used for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u64,
    pub success: u64,
    pub failed: u64,
}

impl StatusCounts {
    /// Total number of recorded URLs
    pub fn total(&self) -> u64 {
        self.pending + self.success + self.failed
    }
}

/// The durable per-URL visitation ledger
///
/// Entries move `unclaimed -> pending -> {success, failed}` exactly once.
/// The raw map is never exposed; mutation happens only through `claim` and
/// `finalize` so the transition invariant holds under concurrent callers.
pub struct VisitLedger {
    status_path: PathBuf,
    entries: Mutex<HashMap<String, VisitStatus>>,
}

impl VisitLedger {
    /// Creates an empty ledger that will persist to `status_path`
    pub fn new(status_path: &Path) -> Self {
        Self {
            status_path: status_path.to_path_buf(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Reconstructs the ledger from the status file
    ///
    /// A missing file means a fresh crawl and yields an empty ledger.
    /// Entries left `pending` by an interrupted run were never finished, so
    /// they are dropped here and can be claimed again.
    pub fn load(status_path: &Path) -> LedgerResult<Self> {
        if !status_path.exists() {
            tracing::info!(
                "No status file at {}, starting with an empty ledger",
                status_path.display()
            );
            return Ok(Self::new(status_path));
        }

        let content = std::fs::read_to_string(status_path)?;
        let mut entries: HashMap<String, VisitStatus> = serde_json::from_str(&content)?;

        let before = entries.len();
        entries.retain(|_, status| status.is_terminal());
        let dropped = before - entries.len();
        if dropped > 0 {
            tracing::info!(
                "Dropped {} pending entries from an interrupted run",
                dropped
            );
        }

        tracing::info!(
            "Loaded {} terminal entries from {}",
            entries.len(),
            status_path.display()
        );

        Ok(Self {
            status_path: status_path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    /// Reads per-status counts straight from a status file
    ///
    /// Unlike `load`, pending entries are kept, so an interrupted run is
    /// visible when inspecting a ledger.
    pub fn load_counts(status_path: &Path) -> LedgerResult<StatusCounts> {
        let content = std::fs::read_to_string(status_path)?;
        let entries: HashMap<String, VisitStatus> = serde_json::from_str(&content)?;

        let mut counts = StatusCounts::default();
        for status in entries.values() {
            match status {
                VisitStatus::Pending => counts.pending += 1,
                VisitStatus::Success => counts.success += 1,
                VisitStatus::Failed => counts.failed += 1,
            }
        }
        Ok(counts)
    }

    /// Atomically claims a URL for processing
    ///
    /// Returns true iff the URL was unclaimed; the entry is then `pending`
    /// and the caller owns processing it. Returns false for URLs already
    /// pending or terminal. Check and set happen under one lock acquisition;
    /// two racing callers can never both get true.
    pub fn claim(&self, url: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(url) {
            return false;
        }
        entries.insert(url.to_string(), VisitStatus::Pending);
        true
    }

    /// Finalizes a pending entry to a terminal status
    ///
    /// Calling this on a URL that is not currently pending is a programming
    /// error on the caller's side; the ledger logs it and leaves the entry
    /// untouched rather than breaking the transition invariant.
    pub fn finalize(&self, url: &str, status: VisitStatus) {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(url) {
            Some(current) if current.can_become(status) => {
                entries.insert(url.to_string(), status);
            }
            Some(current) => {
                tracing::warn!(
                    "Refusing finalize of {} to {}: entry is {}",
                    url,
                    status,
                    current
                );
            }
            None => {
                tracing::warn!("Refusing finalize of unclaimed URL {}", url);
            }
        }
    }

    /// Writes the full ledger to the status file
    ///
    /// The file is rewritten wholesale, so after a crash it reflects the
    /// state as of whichever page persisted last.
    pub fn persist(&self) -> LedgerResult<()> {
        let snapshot = self.entries.lock().unwrap().clone();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.status_path, json)?;
        Ok(())
    }

    /// Returns the recorded status of a URL, if any
    pub fn status_of(&self, url: &str) -> Option<VisitStatus> {
        self.entries.lock().unwrap().get(url).copied()
    }

    /// Returns the number of recorded URLs
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns true if no URLs have been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Counts entries per status
    pub fn counts(&self) -> StatusCounts {
        let entries = self.entries.lock().unwrap();
        let mut counts = StatusCounts::default();
        for status in entries.values() {
            match status {
                VisitStatus::Pending => counts.pending += 1,
                VisitStatus::Success => counts.success += 1,
                VisitStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }
}
