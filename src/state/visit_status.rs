/// Status definitions for tracking crawl progress
///
/// This module defines all possible statuses a URL can be in during a crawl.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the current status of a URL in the visitation ledger
///
/// A URL moves `unclaimed -> Pending -> {Success, Failed}` exactly once.
/// Terminal statuses are never reset within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    /// URL has been claimed by a crawl task; fetch is in flight
    Pending,

    /// URL was fetched and processed
    Success,

    /// Fetch returned a non-success status or a transport error
    Failed,
}

impl VisitStatus {
    /// Returns true if this is a terminal status (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if a transition from `self` to `next` is legal
    ///
    /// The only legal mutation of a recorded status is finalizing a
    /// pending entry. Terminal statuses accept no transitions.
    pub fn can_become(&self, next: VisitStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Success) | (Self::Pending, Self::Failed)
        )
    }

    /// Converts the status to its ledger string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its ledger string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
