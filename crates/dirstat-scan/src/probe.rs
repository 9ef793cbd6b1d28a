//! Single-entry metadata probe.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use dirstat_core::{Entry, EntryKind, InodeInfo, ScanWarning};

/// Errors from probing one filesystem entry.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The entry does not exist (or vanished between listing and probing).
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied reading the entry's metadata.
    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Other I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Downgrade into the non-fatal diagnostic recorded during a walk.
    pub fn to_warning(&self) -> ScanWarning {
        match self {
            Self::PermissionDenied { path } => ScanWarning::permission_denied(path),
            Self::NotFound { path } => ScanWarning::new(
                path,
                format!("entry vanished during walk: {}", path.display()),
                dirstat_core::WarningKind::Io,
            ),
            Self::Io { path, source } => ScanWarning::io(path, source),
        }
    }
}

/// Probe one filesystem entry without following symlinks.
///
/// A symlink's own footprint (the link itself, not its target) is what is
/// reported; a directory's own size is 0. Read-only, safe to call
/// concurrently on disjoint paths.
pub fn probe(path: &Path) -> Result<Entry, ProbeError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| ProbeError::from_io(path, e))?;
    let file_type = metadata.file_type();

    let kind = if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else {
        EntryKind::Other
    };

    let size = match kind {
        EntryKind::Directory => 0,
        _ => metadata.len(),
    };

    Ok(Entry {
        path: path.to_path_buf(),
        kind,
        size,
        modified: metadata.modified().ok(),
        inode: inode_of(&metadata),
        nlink: nlink_of(&metadata),
    })
}

// Cross-platform metadata helpers

#[cfg(unix)]
fn inode_of(metadata: &fs::Metadata) -> Option<InodeInfo> {
    use std::os::unix::fs::MetadataExt;
    Some(InodeInfo::new(metadata.ino(), metadata.dev()))
}

#[cfg(not(unix))]
fn inode_of(_metadata: &fs::Metadata) -> Option<InodeInfo> {
    None
}

#[cfg(unix)]
fn nlink_of(metadata: &fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
fn nlink_of(_metadata: &fs::Metadata) -> u64 {
    1
}

/// Inode identity of already-fetched (followed) metadata.
pub(crate) fn followed_inode(metadata: &fs::Metadata) -> Option<InodeInfo> {
    inode_of(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_probe_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        File::create(&path).unwrap().write_all(b"hello").unwrap();

        let entry = probe(&path).unwrap();
        assert!(entry.is_file());
        assert_eq!(entry.size, 5);
        assert!(entry.modified.is_some());
    }

    #[test]
    fn test_probe_directory_has_zero_own_size() {
        let temp = TempDir::new().unwrap();
        let entry = probe(temp.path()).unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.size, 0);
    }

    #[test]
    fn test_probe_missing_path() {
        let temp = TempDir::new().unwrap();
        let err = probe(&temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, ProbeError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_symlink_reports_link_not_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target.bin");
        File::create(&target)
            .unwrap()
            .write_all(&[0u8; 4096])
            .unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let entry = probe(&link).unwrap();
        assert!(entry.is_symlink());
        // The link's own footprint, never the 4 KiB target.
        assert!(entry.size < 4096);
    }
}
