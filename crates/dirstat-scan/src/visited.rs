//! Visited-set over (device, inode) pairs.

use dashmap::DashSet;

use dirstat_core::InodeInfo;

/// Concurrent set of (device, inode) identities seen during a walk.
///
/// Serves two purposes: terminating symlink cycles when link-following is
/// enabled (a directory identity seen twice means recursing would loop),
/// and counting a multiply-hardlinked file's size exactly once.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: DashSet<InodeInfo>,
}

impl VisitedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            seen: DashSet::new(),
        }
    }

    /// Record an identity. Returns `true` on the first sighting, `false`
    /// when it was already present.
    pub fn first_sighting(&self, info: InodeInfo) -> bool {
        self.seen.insert(info)
    }

    /// Check whether an identity has been recorded, without recording it.
    pub fn has_seen(&self, info: &InodeInfo) -> bool {
        self.seen.contains(info)
    }

    /// Number of distinct identities recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_then_repeat() {
        let visited = VisitedSet::new();
        let id = InodeInfo::new(77, 1);

        assert!(visited.first_sighting(id));
        assert!(!visited.first_sighting(id));
        assert!(visited.has_seen(&id));
    }

    #[test]
    fn test_same_inode_different_device() {
        let visited = VisitedSet::new();
        assert!(visited.first_sighting(InodeInfo::new(77, 1)));
        assert!(visited.first_sighting(InodeInfo::new(77, 2)));
        assert_eq!(visited.len(), 2);
    }
}
