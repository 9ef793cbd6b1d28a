//! Filesystem entries and aggregated tree nodes.

use std::path::PathBuf;
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Inode identity for cycle termination and hardlink deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InodeInfo {
    /// Inode number.
    pub inode: u64,
    /// Device ID.
    pub device: u64,
}

impl InodeInfo {
    /// Create new inode info.
    pub fn new(inode: u64, device: u64) -> Self {
        Self { inode, device }
    }
}

/// Kind of a single filesystem entry, as reported by a metadata probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (not followed by the probe).
    Symlink,
    /// Other file types (sockets, devices, etc.).
    Other,
}

/// Immutable snapshot of one filesystem node taken at scan time.
///
/// `size` is the entry's own footprint: the file length for regular files,
/// the link's own length for symlinks, and 0 for directories (a directory
/// contributes no intrinsic size; its aggregate lives on [`Node`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: EntryKind,
    /// Own size in bytes.
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
    /// Inode identity (unix only).
    pub inode: Option<InodeInfo>,
    /// Number of hard links to this entry.
    pub nlink: u64,
}

impl Entry {
    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Check if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Check if this entry is a symlink.
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}

/// Why a subtree's aggregate is incomplete or why a node was not expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipMarker {
    /// The directory could not be listed: permission denied.
    PermissionDenied,
    /// The directory could not be listed: other I/O error.
    Io,
    /// Symlink recorded as a zero-weight leaf instead of being followed.
    SymlinkSkipped,
    /// Symlink target was already visited; recursing would cycle.
    CycleSkipped,
    /// The depth limit stopped expansion of this directory.
    DepthLimited,
}

impl SkipMarker {
    /// Whether this marker makes the enclosing aggregates a lower bound.
    ///
    /// `SymlinkSkipped` does not: in the default mode a symlink's own
    /// footprint is exactly what the tool defines as its size.
    pub fn makes_partial(self) -> bool {
        !matches!(self, SkipMarker::SymlinkSkipped)
    }
}

/// Type of a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Regular file.
    File,
    /// Directory with aggregated counts over its whole subtree.
    Directory {
        /// Total number of files in this subtree.
        file_count: u64,
        /// Total number of directories in this subtree.
        dir_count: u64,
    },
    /// Symbolic link.
    Symlink {
        /// Link target path.
        target: CompactString,
    },
    /// Other file types.
    Other,
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, NodeKind::Symlink { .. })
    }
}

/// One node of the aggregated tree built by a walk.
///
/// The tree is strict: children are owned exclusively by their parent, and
/// paths are reconstructed by joining names from the root downward.
///
/// Invariant: for a directory, `size` equals the sum of the sizes of its
/// directory children plus the own sizes of its non-directory children.
/// When `partial` is set the aggregate is a lower bound, never an exact
/// figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// File or directory name (not the full path).
    pub name: CompactString,
    /// Node kind and per-kind metadata.
    pub kind: NodeKind,
    /// Own size for files/symlinks, aggregated size for directories.
    pub size: u64,
    /// Last modification time, when available.
    pub modified: Option<SystemTime>,
    /// Skip markers recorded on this node.
    pub skips: Vec<SkipMarker>,
    /// True if this subtree's aggregate is a lower bound.
    pub partial: bool,
    /// Child nodes, sorted by size descending after the walk.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a file node.
    pub fn file(name: impl Into<CompactString>, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            size,
            modified,
            skips: Vec::new(),
            partial: false,
            children: Vec::new(),
        }
    }

    /// Create an (initially empty) directory node.
    pub fn directory(name: impl Into<CompactString>, modified: Option<SystemTime>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory {
                file_count: 0,
                dir_count: 0,
            },
            size: 0,
            modified,
            skips: Vec::new(),
            partial: false,
            children: Vec::new(),
        }
    }

    /// Create a symlink leaf carrying the link's own footprint.
    pub fn symlink(
        name: impl Into<CompactString>,
        target: impl Into<CompactString>,
        size: u64,
        modified: Option<SystemTime>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Symlink {
                target: target.into(),
            },
            size,
            modified,
            skips: Vec::new(),
            partial: false,
            children: Vec::new(),
        }
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this node is a symlink.
    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }

    /// Record a skip marker, raising `partial` when the marker degrades
    /// the aggregate to a lower bound.
    pub fn mark_skip(&mut self, marker: SkipMarker) {
        if marker.makes_partial() {
            self.partial = true;
        }
        self.skips.push(marker);
    }

    /// Total files in this subtree (1 for a file node).
    pub fn file_count(&self) -> u64 {
        match &self.kind {
            NodeKind::Directory { file_count, .. } => *file_count,
            NodeKind::File => 1,
            _ => 0,
        }
    }

    /// Total directories in this subtree (excluding this node).
    pub fn dir_count(&self) -> u64 {
        match &self.kind {
            NodeKind::Directory { dir_count, .. } => *dir_count,
            _ => 0,
        }
    }

    /// Total entries aggregated in this subtree, this node included.
    pub fn entry_count(&self) -> u64 {
        match &self.kind {
            NodeKind::Directory {
                file_count,
                dir_count,
            } => file_count + dir_count + 1,
            _ => 1,
        }
    }

    /// Recompute this directory's aggregates from its children.
    ///
    /// Children must already be fully aggregated (post-order discipline);
    /// this is O(direct children), never a re-walk.
    pub fn aggregate_children(&mut self) {
        if !self.is_dir() {
            return;
        }

        let mut size: u64 = 0;
        let mut files: u64 = 0;
        let mut dirs: u64 = 0;
        let mut partial = self.skips.iter().any(|s| s.makes_partial());

        for child in &self.children {
            size += child.size;
            files += child.file_count();
            if child.is_dir() {
                dirs += child.dir_count() + 1;
            }
            partial |= child.partial;
        }

        self.size = size;
        self.partial = partial;
        self.kind = NodeKind::Directory {
            file_count: files,
            dir_count: dirs,
        };
    }

    /// Sort direct children by size, largest first.
    pub fn sort_children_by_size(&mut self) {
        self.children
            .sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
    }
}
