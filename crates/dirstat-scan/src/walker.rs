//! Recursive parallel tree walker with folded aggregation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Instant, SystemTime};

use compact_str::CompactString;
use globset::GlobSet;
use rayon::prelude::*;
use tracing::{debug, warn};

use dirstat_core::{
    Entry, EntryKind, Node, NodeKind, ScanTree, ScanWarning, SkipMarker, WalkError, WalkOptions,
};

use crate::cancel::CancelFlag;
use crate::probe::{followed_inode, probe};
use crate::visited::VisitedSet;

/// Depth-first walker producing a fully aggregated [`ScanTree`].
///
/// Sibling directory subtrees are walked on rayon workers; each recursion
/// frame returns an already-aggregated subtree, so merging child totals
/// into the parent is the only synchronization point. Per-subtree failures
/// degrade into skip markers and diagnostics; only a failure on the root
/// itself is fatal.
#[derive(Debug, Default)]
pub struct TreeWalker;

impl TreeWalker {
    /// Create a new walker.
    pub fn new() -> Self {
        Self
    }

    /// Walk a subtree to completion.
    pub fn walk(&self, options: &WalkOptions) -> Result<ScanTree, WalkError> {
        self.walk_with_cancel(options, &CancelFlag::new())
    }

    /// Walk a subtree, aborting with [`WalkError::Cancelled`] if the flag
    /// is raised between directory visits.
    pub fn walk_with_cancel(
        &self,
        options: &WalkOptions,
        cancel: &CancelFlag,
    ) -> Result<ScanTree, WalkError> {
        let start = Instant::now();

        let root_path = options
            .root
            .canonicalize()
            .map_err(|e| WalkError::root_io(&options.root, e))?;
        let root_metadata =
            fs::metadata(&root_path).map_err(|e| WalkError::root_io(&root_path, e))?;
        if !root_metadata.is_dir() {
            return Err(WalkError::RootNotDirectory { path: root_path });
        }

        let excludes = options
            .compile_excludes()
            .map_err(|e| WalkError::InvalidOptions {
                message: e.to_string(),
            })?;

        let ctx = WalkContext {
            options,
            excludes,
            visited: VisitedSet::new(),
            cancel,
            warnings: Mutex::new(Vec::new()),
        };

        // Seed the visited set with the root so a link pointing back at it
        // is caught on the first revisit.
        if options.follow_symlinks {
            if let Some(id) = followed_inode(&root_metadata) {
                ctx.visited.first_sighting(id);
            }
        }

        let root_name: CompactString = root_path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::new(root_path.to_string_lossy()));
        let root_modified = root_metadata.modified().ok();

        let root_node = if options.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.threads)
                .build()
                .map_err(|e| WalkError::InvalidOptions {
                    message: e.to_string(),
                })?;
            pool.install(|| ctx.walk_dir(&root_path, root_name, root_modified, 0))
        } else {
            ctx.walk_dir(&root_path, root_name, root_modified, 0)
        };

        if cancel.is_cancelled() {
            return Err(WalkError::Cancelled);
        }

        let warnings = ctx
            .warnings
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        debug!(
            path = %root_path.display(),
            bytes = root_node.size,
            warnings = warnings.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "walk finished"
        );

        Ok(ScanTree::new(
            root_node,
            root_path,
            options.clone(),
            start.elapsed(),
            warnings,
        ))
    }
}

/// Shared, read-mostly state for one walk.
struct WalkContext<'a> {
    options: &'a WalkOptions,
    excludes: GlobSet,
    visited: VisitedSet,
    cancel: &'a CancelFlag,
    warnings: Mutex<Vec<ScanWarning>>,
}

impl WalkContext<'_> {
    fn push_warning(&self, warning: ScanWarning) {
        warn!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
        self.warnings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(warning);
    }

    /// Walk one directory, returning its fully aggregated node.
    fn walk_dir(
        &self,
        path: &Path,
        name: CompactString,
        modified: Option<SystemTime>,
        depth: u32,
    ) -> Node {
        let mut node = Node::directory(name, modified);

        if self.cancel.is_cancelled() {
            return node;
        }

        if let Some(limit) = self.options.max_depth {
            if depth >= limit {
                node.mark_skip(SkipMarker::DepthLimited);
                self.push_warning(ScanWarning::depth_limited(path));
                return node;
            }
        }

        let reader = match fs::read_dir(path) {
            Ok(reader) => reader,
            Err(err) => {
                let marker = if err.kind() == std::io::ErrorKind::PermissionDenied {
                    node.mark_skip(SkipMarker::PermissionDenied);
                    ScanWarning::permission_denied(path)
                } else {
                    node.mark_skip(SkipMarker::Io);
                    ScanWarning::io(path, &err)
                };
                self.push_warning(marker);
                return node;
            }
        };

        let mut leaves: Vec<Node> = Vec::new();
        let mut subdirs: Vec<(PathBuf, CompactString, Option<SystemTime>)> = Vec::new();

        for dirent in reader {
            let dirent = match dirent {
                Ok(dirent) => dirent,
                Err(err) => {
                    node.mark_skip(SkipMarker::Io);
                    self.push_warning(ScanWarning::io(path, &err));
                    continue;
                }
            };

            let child_path = dirent.path();
            let file_name = dirent.file_name();
            let name = CompactString::new(file_name.to_string_lossy());

            if self.excludes.is_match(name.as_str()) {
                debug!(path = %child_path.display(), "excluded by pattern");
                continue;
            }

            let entry = match probe(&child_path) {
                Ok(entry) => entry,
                Err(err) => {
                    node.mark_skip(SkipMarker::Io);
                    self.push_warning(err.to_warning());
                    continue;
                }
            };

            match entry.kind {
                EntryKind::Directory => {
                    if self.enter_directory(&entry, &child_path, &mut node) {
                        subdirs.push((child_path, name, entry.modified));
                    }
                }
                EntryKind::File => {
                    leaves.push(Node::file(name, self.file_size(&entry), entry.modified));
                }
                EntryKind::Symlink => {
                    self.visit_symlink(&child_path, name, &entry, &mut leaves, &mut subdirs);
                }
                EntryKind::Other => {
                    leaves.push(Node {
                        name,
                        kind: NodeKind::Other,
                        size: 0,
                        modified: entry.modified,
                        skips: Vec::new(),
                        partial: false,
                        children: Vec::new(),
                    });
                }
            }
        }

        // Sibling subtrees in parallel; each comes back fully aggregated.
        let mut dir_children: Vec<Node> = subdirs
            .into_par_iter()
            .map(|(child_path, name, modified)| self.walk_dir(&child_path, name, modified, depth + 1))
            .collect();

        node.children = leaves;
        node.children.append(&mut dir_children);
        node.aggregate_children();
        node.sort_children_by_size();
        node
    }

    /// Whether to recurse into a real (non-link) directory.
    ///
    /// With link-following on, every directory identity goes through the
    /// visited set so the walk terminates even when links alias real
    /// directories.
    fn enter_directory(&self, entry: &Entry, path: &Path, parent: &mut Node) -> bool {
        if !self.options.follow_symlinks {
            return true;
        }
        match entry.inode {
            Some(id) if !self.visited.first_sighting(id) => {
                parent.mark_skip(SkipMarker::CycleSkipped);
                self.push_warning(ScanWarning::cycle(path));
                false
            }
            _ => true,
        }
    }

    /// Own size of a regular file, counting multiply-hardlinked inodes once.
    fn file_size(&self, entry: &Entry) -> u64 {
        if entry.nlink > 1 {
            if let Some(id) = entry.inode {
                if !self.visited.first_sighting(id) {
                    return 0;
                }
            }
        }
        entry.size
    }

    /// Handle a symlink child: a zero-weight leaf by default, or a
    /// candidate subtree when link-following is enabled.
    fn visit_symlink(
        &self,
        path: &Path,
        name: CompactString,
        entry: &Entry,
        leaves: &mut Vec<Node>,
        subdirs: &mut Vec<(PathBuf, CompactString, Option<SystemTime>)>,
    ) {
        let target = fs::read_link(path)
            .map(|t| CompactString::new(t.to_string_lossy()))
            .unwrap_or_default();

        if !self.options.follow_symlinks {
            let mut leaf = Node::symlink(name, target, entry.size, entry.modified);
            leaf.mark_skip(SkipMarker::SymlinkSkipped);
            leaves.push(leaf);
            return;
        }

        match fs::metadata(path) {
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    self.push_warning(ScanWarning::broken_symlink(path, target.as_str()));
                } else {
                    self.push_warning(ScanWarning::io(path, &err));
                }
                let mut leaf = Node::symlink(name, target, entry.size, entry.modified);
                leaf.mark_skip(SkipMarker::SymlinkSkipped);
                leaves.push(leaf);
            }
            Ok(metadata) if metadata.is_dir() => {
                match followed_inode(&metadata) {
                    Some(id) if !self.visited.first_sighting(id) => {
                        let mut leaf = Node::symlink(name, target, entry.size, entry.modified);
                        leaf.mark_skip(SkipMarker::CycleSkipped);
                        leaves.push(leaf);
                        self.push_warning(ScanWarning::cycle(path));
                    }
                    _ => subdirs.push((path.to_path_buf(), name, metadata.modified().ok())),
                }
            }
            Ok(metadata) => {
                // Followed link to a file: weigh the target.
                leaves.push(Node::file(name, metadata.len(), metadata.modified().ok()));
            }
        }
    }
}
