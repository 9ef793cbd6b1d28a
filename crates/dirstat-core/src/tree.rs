//! Scanned tree container and summary statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::WalkOptions;
use crate::error::ScanWarning;
use crate::node::{Node, NodeKind};

/// Summary statistics for a scanned tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total aggregated size in bytes.
    pub total_size: u64,
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories (scan root excluded).
    pub total_dirs: u64,
    /// Total number of symbolic links.
    pub total_symlinks: u64,
    /// Maximum depth reached below the root.
    pub max_depth: u32,
}

impl TreeStats {
    /// Compute stats from a fully aggregated root node.
    pub fn from_root(root: &Node) -> Self {
        let mut stats = Self {
            total_size: root.size,
            ..Self::default()
        };
        for child in &root.children {
            stats.visit(child, 1);
        }
        stats
    }

    fn visit(&mut self, node: &Node, depth: u32) {
        self.max_depth = self.max_depth.max(depth);
        match &node.kind {
            NodeKind::File => self.total_files += 1,
            NodeKind::Symlink { .. } => self.total_symlinks += 1,
            NodeKind::Directory { .. } => {
                self.total_dirs += 1;
                for child in &node.children {
                    self.visit(child, depth + 1);
                }
            }
            NodeKind::Other => {}
        }
    }
}

/// Result of one walk: the aggregated tree plus its diagnostics.
///
/// The walker constructs and exclusively owns the node tree; consumers
/// (ranking, rendering) take a read-only view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTree {
    /// Root node of the tree.
    pub root: Node,

    /// Root path that was walked.
    pub root_path: PathBuf,

    /// When this walk was performed.
    pub scanned_at: SystemTime,

    /// Duration of the walk.
    pub scan_duration: Duration,

    /// Options used.
    pub options: WalkOptions,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Non-fatal issues encountered; when non-empty, subtree sizes under
    /// the marked paths are lower bounds.
    pub warnings: Vec<ScanWarning>,
}

impl ScanTree {
    /// Build a tree result, deriving the stats from the root node.
    pub fn new(
        root: Node,
        root_path: PathBuf,
        options: WalkOptions,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        let stats = TreeStats::from_root(&root);
        Self {
            root,
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            options,
            stats,
            warnings,
        }
    }

    /// Total aggregated size of the tree.
    pub fn total_size(&self) -> u64 {
        self.root.size
    }

    /// Whether any subtree was skipped, making totals lower bounds.
    pub fn is_partial(&self) -> bool {
        self.root.partial
    }

    /// Check if there were any warnings during the walk.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Visit every directory node strictly below the root, with its
    /// reconstructed absolute path.
    pub fn for_each_directory<F: FnMut(&PathBuf, &Node)>(&self, mut f: F) {
        fn visit<F: FnMut(&PathBuf, &Node)>(node: &Node, path: &PathBuf, f: &mut F) {
            for child in &node.children {
                if child.is_dir() {
                    let child_path = path.join(child.name.as_str());
                    f(&child_path, child);
                    visit(child, &child_path, f);
                }
            }
        }
        visit(&self.root, &self.root_path, &mut f);
    }
}
