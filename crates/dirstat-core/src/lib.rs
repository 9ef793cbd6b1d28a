//! Core types for dirstat.
//!
//! This crate provides the fundamental data structures shared by the
//! dirstat workspace: filesystem entries, the aggregated directory tree,
//! walk options, and the error/diagnostic types.

mod config;
mod error;
mod node;
mod tree;

pub use config::{WalkOptions, WalkOptionsBuilder};
pub use error::{ScanWarning, WalkError, WarningKind};
pub use node::{Entry, EntryKind, InodeInfo, Node, NodeKind, SkipMarker};
pub use tree::{ScanTree, TreeStats};
