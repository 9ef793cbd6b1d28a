//! Application name to candidate path resolution.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One known directory name under a support root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Support root (for example `~/Library/Caches`).
    pub root: PathBuf,
    /// Directory name found (or registered) under that root.
    pub name: String,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    /// Full candidate path.
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.name)
    }
}

/// Pluggable lookup table of known per-application directories.
///
/// The inventory is the only place the name-to-path convention lives;
/// resolution itself never touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct CandidateInventory {
    entries: Vec<Candidate>,
}

impl CandidateInventory {
    /// Build an inventory from explicit entries, keeping their order.
    pub fn new(entries: Vec<Candidate>) -> Self {
        Self { entries }
    }

    /// Conventional per-user support roots for this platform.
    #[cfg(target_os = "macos")]
    pub fn platform_roots(home: &Path) -> Vec<PathBuf> {
        vec![
            home.join("Library/Caches"),
            home.join("Library/Application Support"),
            home.join("Library/Logs"),
            home.join("Library/Containers"),
        ]
    }

    /// Conventional per-user support roots for this platform.
    #[cfg(not(target_os = "macos"))]
    pub fn platform_roots(home: &Path) -> Vec<PathBuf> {
        vec![
            home.join(".cache"),
            home.join(".local/share"),
            home.join(".local/state"),
            home.join(".config"),
        ]
    }

    /// List the directories under each root to populate the table.
    ///
    /// This is the one filesystem-touching step of resolution; missing or
    /// unreadable roots are skipped. Names under a root are sorted so the
    /// candidate order is deterministic.
    pub fn from_roots(roots: &[PathBuf]) -> Self {
        let mut entries = Vec::new();
        for root in roots {
            let reader = match fs::read_dir(root) {
                Ok(reader) => reader,
                Err(err) => {
                    debug!(root = %root.display(), "support root unavailable: {err}");
                    continue;
                }
            };

            let mut names: Vec<String> = reader
                .filter_map(|dirent| dirent.ok())
                .filter(|dirent| {
                    dirent
                        .file_type()
                        .map(|file_type| file_type.is_dir())
                        .unwrap_or(false)
                })
                .map(|dirent| dirent.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();

            entries.extend(names.into_iter().map(|name| Candidate::new(root, name)));
        }
        Self { entries }
    }

    /// Number of known directories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the inventory is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps an application name to candidate cleanup locations.
#[derive(Debug, Clone)]
pub struct CleanupResolver {
    inventory: CandidateInventory,
}

impl CleanupResolver {
    /// Create a resolver over an inventory.
    pub fn new(inventory: CandidateInventory) -> Self {
        Self { inventory }
    }

    /// Resolve an application name to an ordered list of candidate paths.
    ///
    /// Pure: filters the inventory by ASCII-case-insensitive exact match
    /// of the directory name. An unmatched name yields an empty list, not
    /// an error; the caller decides whether that is user-facing failure.
    pub fn resolve(&self, app_name: &str) -> Vec<PathBuf> {
        let app = app_name.trim();
        if app.is_empty() {
            return Vec::new();
        }
        self.inventory
            .entries
            .iter()
            .filter(|candidate| candidate.name.eq_ignore_ascii_case(app))
            .map(Candidate::path)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resolver() -> CleanupResolver {
        CleanupResolver::new(CandidateInventory::new(vec![
            Candidate::new("/home/u/.cache", "Firefox"),
            Candidate::new("/home/u/.cache", "chromium"),
            Candidate::new("/home/u/.local/share", "firefox"),
        ]))
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let resolver = sample_resolver();
        let candidates = resolver.resolve("FIREFOX");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/home/u/.cache/Firefox"),
                PathBuf::from("/home/u/.local/share/firefox"),
            ]
        );
    }

    #[test]
    fn test_unmatched_name_is_empty_not_an_error() {
        assert!(sample_resolver().resolve("notthere").is_empty());
        assert!(sample_resolver().resolve("  ").is_empty());
    }

    #[test]
    fn test_platform_roots_are_under_home() {
        let roots = CandidateInventory::platform_roots(Path::new("/home/u"));
        assert!(!roots.is_empty());
        assert!(roots.iter().all(|r| r.starts_with("/home/u")));
    }
}
