//! Two-phase preview/execute deletion.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use dirstat_core::WalkOptions;
use dirstat_scan::TreeWalker;

/// Errors that stop a cleanup before anything is touched.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The confirmation gate was not passed.
    #[error("deletion not confirmed; nothing was removed")]
    NotConfirmed,
}

/// A per-path deletion failure recorded in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionError {
    /// Path that could not be deleted.
    pub path: PathBuf,
    /// Human-readable cause.
    pub message: String,
}

impl DeletionError {
    fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DeletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Outcome of one cleanup execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletionReport {
    /// Candidates that were removed.
    pub deleted: Vec<PathBuf>,
    /// Bytes reclaimed, measured immediately before each deletion.
    pub freed_bytes: u64,
    /// Per-path failures; the batch continued past each of them.
    pub errors: Vec<DeletionError>,
}

impl DeletionReport {
    /// Whether every candidate was deleted without failure.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Sizes and deletes resolved cleanup candidates.
#[derive(Debug, Default)]
pub struct CleanupExecutor;

impl CleanupExecutor {
    /// Create an executor.
    pub fn new() -> Self {
        Self
    }

    /// Compute the reclaimable size of each candidate that exists.
    ///
    /// Candidates that do not exist are silently omitted; the preview
    /// reports what a confirmed execution would actually remove.
    pub fn preview(&self, candidates: &[PathBuf]) -> Vec<(PathBuf, u64)> {
        candidates
            .iter()
            .filter_map(|path| self.measure(path).map(|size| (path.clone(), size)))
            .collect()
    }

    /// Delete the candidates, best-effort.
    ///
    /// `confirmed` is a hard gate: without it nothing is touched and
    /// [`CleanError::NotConfirmed`] is returned. Each candidate is
    /// attempted independently; a failure (permission denied, path
    /// vanished since the preview) is recorded and the batch continues.
    pub fn execute(
        &self,
        candidates: &[PathBuf],
        confirmed: bool,
    ) -> Result<DeletionReport, CleanError> {
        if !confirmed {
            return Err(CleanError::NotConfirmed);
        }

        let mut report = DeletionReport::default();
        for path in candidates {
            let metadata = match fs::symlink_metadata(path) {
                Ok(metadata) => metadata,
                Err(err) => {
                    report
                        .errors
                        .push(DeletionError::new(path, format!("vanished before deletion: {err}")));
                    continue;
                }
            };

            let size = if metadata.is_dir() {
                self.measure(path).unwrap_or(0)
            } else {
                metadata.len()
            };

            let result = if metadata.is_dir() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };

            match result {
                Ok(()) => {
                    info!(path = %path.display(), bytes = size, "deleted");
                    report.deleted.push(path.clone());
                    report.freed_bytes += size;
                }
                Err(err) => {
                    report.errors.push(DeletionError::new(path, err.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// Size one candidate, or None if it does not exist.
    ///
    /// Directories are walked without following symlinks; an unreadable
    /// but present candidate reports a size of 0 (a lower bound) rather
    /// than disappearing from the preview.
    fn measure(&self, path: &Path) -> Option<u64> {
        let metadata = fs::symlink_metadata(path).ok()?;
        if !metadata.is_dir() {
            return Some(metadata.len());
        }
        match TreeWalker::new().walk(&WalkOptions::new(path)) {
            Ok(tree) => Some(tree.total_size()),
            Err(err) => {
                warn!(path = %path.display(), "cannot size candidate: {err}");
                Some(0)
            }
        }
    }
}
