//! Analysis over scanned trees for dirstat.
//!
//! This crate provides the reporting side of the workspace:
//!
//! - **Ranking** - top-N directories by aggregated size, considering every
//!   directory anywhere below the scan root, with a deterministic
//!   tie-break (descending size, then ascending path).
//! - **Capacity** - filesystem-level usage via `statvfs` with the 80%/90%
//!   health thresholds.
//!
//! ```rust,ignore
//! use dirstat_analyze::top_n;
//! use dirstat_scan::{TreeWalker, WalkOptions};
//!
//! let tree = TreeWalker::new().walk(&WalkOptions::new("/var")).unwrap();
//! for entry in top_n(&tree, 10) {
//!     println!("{:>12}  {}", entry.size, entry.path.display());
//! }
//! ```

mod rank;
mod usage;

pub use rank::{top_n, RankedEntry};
pub use usage::{disk_usage, DiskUsage, HealthStatus, UsageError, CRITICAL_PERCENT, WARNING_PERCENT};

// Re-export core types
pub use dirstat_core::{Node, ScanTree, TreeStats};
