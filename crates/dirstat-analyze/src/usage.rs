//! Filesystem capacity query and health thresholds.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Used-space percentage at which the filesystem is considered low.
pub const WARNING_PERCENT: f64 = 80.0;

/// Used-space percentage at which the filesystem is considered critical.
pub const CRITICAL_PERCENT: f64 = 90.0;

/// Errors from querying filesystem capacity.
#[derive(Debug, Error)]
pub enum UsageError {
    /// The statvfs query failed.
    #[error("cannot query filesystem stats for {path}: {message}")]
    Query { path: PathBuf, message: String },

    /// No capacity API on this platform.
    #[error("filesystem capacity query is not supported on this platform")]
    Unsupported,
}

/// Capacity snapshot of the filesystem holding a path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskUsage {
    /// Path the query was made for.
    pub path: PathBuf,
    /// Total capacity in bytes.
    pub total_bytes: u64,
    /// Bytes in use.
    pub used_bytes: u64,
    /// Bytes available to unprivileged processes.
    pub free_bytes: u64,
}

impl DiskUsage {
    /// Percentage of capacity in use, 0.0 for an empty filesystem.
    pub fn percent_used(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_bytes as f64 * 100.0
        }
    }

    /// Classify against the warning/critical thresholds.
    pub fn health(&self) -> HealthStatus {
        let used = self.percent_used();
        if used >= CRITICAL_PERCENT {
            HealthStatus::Critical
        } else if used >= WARNING_PERCENT {
            HealthStatus::Warning
        } else {
            HealthStatus::Good
        }
    }
}

/// Health classification of a filesystem's remaining capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Plenty of space left.
    Good,
    /// Low on space.
    Warning,
    /// Critically low on space.
    Critical,
}

impl HealthStatus {
    /// Short display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// One-line advice for the report.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Good => "plenty of space available",
            Self::Warning => "running low on space; consider cleaning up",
            Self::Critical => "critically low on space; clean up immediately",
        }
    }
}

/// Query the capacity of the filesystem holding `path`.
#[cfg(unix)]
pub fn disk_usage(path: &Path) -> Result<DiskUsage, UsageError> {
    let stat = nix::sys::statvfs::statvfs(path).map_err(|e| UsageError::Query {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let fragment = stat.fragment_size() as u64;
    let total_bytes = fragment * stat.blocks() as u64;
    let free_bytes = fragment * stat.blocks_available() as u64;

    Ok(DiskUsage {
        path: path.to_path_buf(),
        total_bytes,
        used_bytes: total_bytes.saturating_sub(free_bytes),
        free_bytes,
    })
}

/// Query the capacity of the filesystem holding `path`.
#[cfg(not(unix))]
pub fn disk_usage(_path: &Path) -> Result<DiskUsage, UsageError> {
    Err(UsageError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(total: u64, used: u64) -> DiskUsage {
        DiskUsage {
            path: PathBuf::from("/"),
            total_bytes: total,
            used_bytes: used,
            free_bytes: total - used,
        }
    }

    #[test]
    fn test_health_thresholds() {
        assert_eq!(usage(1000, 790).health(), HealthStatus::Good);
        assert_eq!(usage(1000, 800).health(), HealthStatus::Warning);
        assert_eq!(usage(1000, 850).health(), HealthStatus::Warning);
        assert_eq!(usage(1000, 900).health(), HealthStatus::Critical);
        assert_eq!(usage(1000, 950).health(), HealthStatus::Critical);
    }

    #[test]
    fn test_empty_filesystem_is_good() {
        let u = usage(0, 0);
        assert_eq!(u.percent_used(), 0.0);
        assert_eq!(u.health(), HealthStatus::Good);
    }

    #[cfg(unix)]
    #[test]
    fn test_disk_usage_smoke() {
        let u = disk_usage(Path::new("/")).unwrap();
        assert!(u.total_bytes > 0);
        assert!(u.used_bytes <= u.total_bytes);
    }
}
