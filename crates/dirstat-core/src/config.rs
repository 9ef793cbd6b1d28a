//! Walk configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

/// Options controlling a tree walk.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkOptions {
    /// Root path to walk.
    pub root: PathBuf,

    /// Follow symbolic links into their targets.
    ///
    /// When false (the default) symlinks become zero-weight leaves; when
    /// true the walker consults a visited (device, inode) set so cycles
    /// terminate.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Glob patterns matched against entry names; matches are skipped.
    #[builder(default)]
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Maximum depth to expand (None = unlimited). Directories at the
    /// limit become depth-limited leaves.
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Number of worker threads (0 = rayon default).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

impl WalkOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.root {
            Some(root) if root.as_os_str().is_empty() => {
                Err("root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("root path is required".to_string()),
        }
    }
}

impl WalkOptions {
    /// Create an options builder.
    pub fn builder() -> WalkOptionsBuilder {
        WalkOptionsBuilder::default()
    }

    /// Create default options for walking a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            exclude: Vec::new(),
            max_depth: None,
            threads: 0,
        }
    }

    /// Compile the exclude patterns into a matcher.
    pub fn compile_excludes(&self) -> Result<GlobSet, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            builder.add(Glob::new(pattern)?);
        }
        builder.build()
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = WalkOptions::builder()
            .root("/home/user")
            .follow_symlinks(true)
            .max_depth(Some(4u32))
            .build()
            .unwrap();

        assert_eq!(options.root, PathBuf::from("/home/user"));
        assert!(options.follow_symlinks);
        assert_eq!(options.max_depth, Some(4));
    }

    #[test]
    fn test_builder_rejects_empty_root() {
        assert!(WalkOptions::builder().root("").build().is_err());
        assert!(WalkOptionsBuilder::default().build().is_err());
    }

    #[test]
    fn test_compile_excludes() {
        let options = WalkOptions::builder()
            .root("/t")
            .exclude(vec!["node_modules".to_string(), "*.log".to_string()])
            .build()
            .unwrap();

        let set = options.compile_excludes().unwrap();
        assert!(set.is_match("node_modules"));
        assert!(set.is_match("debug.log"));
        assert!(!set.is_match("src"));
    }

    #[test]
    fn test_compile_excludes_rejects_bad_glob() {
        let options = WalkOptions::builder()
            .root("/t")
            .exclude(vec!["[".to_string()])
            .build()
            .unwrap();
        assert!(options.compile_excludes().is_err());
    }
}
