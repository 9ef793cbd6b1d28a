//! Guarded application-data cleanup for dirstat.
//!
//! Cleanup is a two-phase operation so the destructive part stays
//! testable without interactive input:
//!
//! 1. [`CleanupResolver::resolve`] maps an application name to candidate
//!    cache/support directories, purely from a pluggable inventory.
//! 2. [`CleanupExecutor::preview`] sizes the candidates that exist, and
//!    [`CleanupExecutor::execute`] deletes them only behind an explicit
//!    `confirmed` gate, accumulating per-path failures instead of
//!    aborting the batch.
//!
//! Candidates are resolved fresh on every invocation and never cached
//! across runs.

mod executor;
mod resolver;

pub use executor::{CleanError, CleanupExecutor, DeletionError, DeletionReport};
pub use resolver::{Candidate, CandidateInventory, CleanupResolver};
