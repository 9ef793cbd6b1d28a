//! Error and diagnostic types for tree walks.
//!
//! Fatal conditions on the scan root are [`WalkError`]s and abort the
//! operation; everything below the root degrades into a [`ScanWarning`]
//! carried alongside the partial tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors that abort a walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The root path does not exist.
    #[error("root path not found: {path}")]
    RootNotFound { path: PathBuf },

    /// The root path exists but is not a directory.
    #[error("root path is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },

    /// I/O error on the root path itself.
    #[error("I/O error at {path}: {source}")]
    RootIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The walk was cancelled before completing.
    #[error("walk cancelled")]
    Cancelled,

    /// Invalid walk options (for example a malformed exclude glob).
    #[error("invalid walk options: {message}")]
    InvalidOptions { message: String },
}

impl WalkError {
    /// Classify a root-level I/O error into the matching fatal kind.
    pub fn root_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::RootNotFound { path },
            _ => Self::RootIo { path, source },
        }
    }
}

/// Kind of non-fatal diagnostic collected during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied on a subtree.
    PermissionDenied,
    /// I/O error reading a subtree.
    Io,
    /// Symlink target pointed back into an already-visited directory.
    CycleSkipped,
    /// A directory was left unexpanded by the depth limit.
    DepthLimited,
    /// Symlink target does not exist.
    BrokenSymlink,
}

/// Non-fatal issue recorded during a walk and returned with the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the issue occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Diagnostic kind.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Permission denied on a subtree.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// I/O error on a subtree.
    pub fn io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("read error at {}: {error}", path.display()),
            path,
            kind: WarningKind::Io,
        }
    }

    /// Symlink cycle detected and skipped.
    pub fn cycle(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("symlink cycle skipped at {}", path.display()),
            path,
            kind: WarningKind::CycleSkipped,
        }
    }

    /// Directory left unexpanded by the depth limit.
    pub fn depth_limited(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("depth limit reached at {}", path.display()),
            path,
            kind: WarningKind::DepthLimited,
        }
    }

    /// Broken symlink.
    pub fn broken_symlink(path: impl Into<PathBuf>, target: &str) -> Self {
        let path = path.into();
        Self {
            message: format!("broken symlink: {} -> {target}", path.display()),
            path,
            kind: WarningKind::BrokenSymlink,
        }
    }
}
