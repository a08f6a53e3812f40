//! Storage module for the visitation ledger
//!
//! The ledger is the authoritative record of which URLs have been claimed,
//! succeeded, or failed. It is loaded from a JSON status file at startup and
//! rewritten wholesale on each persist.

mod ledger;

pub use ledger::{LedgerError, LedgerResult, StatusCounts, VisitLedger};
