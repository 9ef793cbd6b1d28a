//! Top-N directory ranking.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dirstat_core::ScanTree;

/// A directory paired with its aggregated size, ordered for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Absolute path of the directory.
    pub path: PathBuf,
    /// Aggregated size in bytes (a lower bound if the subtree was marked
    /// skipped).
    pub size: u64,
}

impl RankedEntry {
    /// Create a ranked entry.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

// Rank ordering: a greater entry ranks higher. Bigger sizes rank higher;
// on equal sizes the lexically smaller path ranks higher, which keeps the
// report deterministic.
impl Ord for RankedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then_with(|| other.path.cmp(&self.path))
    }
}

impl PartialOrd for RankedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Extract the `n` largest directories anywhere below the scan root.
///
/// Every directory node in the tree is considered, not only the root's
/// immediate children. The result is sorted descending by size with ties
/// broken by ascending path, and has length `min(n, directory count)`.
/// `n == 0` yields an empty vector.
///
/// Uses a bounded min-heap so memory stays O(n) even on very large trees.
pub fn top_n(tree: &ScanTree, n: usize) -> Vec<RankedEntry> {
    if n == 0 {
        return Vec::new();
    }

    let mut heap: BinaryHeap<Reverse<RankedEntry>> = BinaryHeap::with_capacity(n + 1);
    tree.for_each_directory(|path, node| {
        heap.push(Reverse(RankedEntry::new(path.clone(), node.size)));
        if heap.len() > n {
            heap.pop();
        }
    });

    let mut ranked: Vec<RankedEntry> = heap.into_iter().map(|entry| entry.0).collect();
    ranked.sort_by(|a, b| b.cmp(a));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering() {
        let big = RankedEntry::new("/z", 100);
        let small = RankedEntry::new("/a", 1);
        assert!(big > small);

        // Equal sizes: the lexically smaller path ranks higher.
        let first = RankedEntry::new("/a", 50);
        let second = RankedEntry::new("/b", 50);
        assert!(first > second);
    }
}
