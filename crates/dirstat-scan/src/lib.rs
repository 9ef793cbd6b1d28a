//! Directory walking and size aggregation engine for dirstat.
//!
//! This crate walks a directory subtree and builds the aggregated tree the
//! rest of the workspace consumes. Key properties:
//!
//! - **Post-order aggregation** folded into the walk: children are summed
//!   into parents as each recursion frame returns, never by re-walking.
//! - **Parallel sibling subtrees** via rayon; each worker returns a fully
//!   aggregated subtree, so the parent's merge is the only synchronization
//!   point.
//! - **Partial-failure tolerance**: unreadable subtrees degrade into skip
//!   markers and diagnostics instead of aborting the walk.
//! - **Symlink safety**: links are zero-weight leaves by default; when
//!   following links a (device, inode) visited set guarantees termination.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirstat_scan::{TreeWalker, WalkOptions};
//!
//! let options = WalkOptions::new("/path/to/walk");
//! let tree = TreeWalker::new().walk(&options).unwrap();
//!
//! println!("total: {} bytes", tree.total_size());
//! if tree.is_partial() {
//!     println!("(lower bound; {} subtrees skipped)", tree.warnings.len());
//! }
//! ```

mod cancel;
mod probe;
mod visited;
mod walker;

pub use cancel::CancelFlag;
pub use probe::{probe, ProbeError};
pub use visited::VisitedSet;
pub use walker::TreeWalker;

// Re-export core types for convenience
pub use dirstat_core::{
    Entry, EntryKind, Node, NodeKind, ScanTree, ScanWarning, SkipMarker, TreeStats, WalkError,
    WalkOptions, WarningKind,
};
