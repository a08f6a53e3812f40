//! Visitation state for tracking crawl progress
//!
//! This module defines the per-URL status machine recorded in the ledger.

mod visit_status;

pub use visit_status::VisitStatus;
