//! Global options shared by every operation

use std::path::{Path, PathBuf};

use crate::core::config::{Config, MissingDirPolicy};

/// Flags and paths fixed for the lifetime of one invocation.
///
/// Built once from the config; mode dispatch may add the host and
/// lock-state flags through the `with_*` builders before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Absolute top-level directory holding every working copy
    pub top_dir: PathBuf,
    /// Pull with `--rebase=merges` instead of `--ff-only`
    pub pull_with_rebase: bool,
    /// Pass `-q` to clone/checkout
    pub quiet: bool,
    /// `git-lfs` was found on this host
    pub has_lfs: bool,
    /// The active config is a locked snapshot
    pub locked: bool,
    pub on_missing_dir: MissingDirPolicy,
    /// Allow `push --tags` after tagging
    pub push_tags: bool,
}

impl GlobalOptions {
    /// Build options from a config, resolving a relative top_dir against `base_dir`
    pub fn from_config(config: &Config, base_dir: &Path) -> Self {
        Self {
            top_dir: resolve_top_dir(&config.top_dir, base_dir),
            pull_with_rebase: config.pull_with_rebase,
            quiet: false,
            has_lfs: false,
            locked: false,
            on_missing_dir: config.on_missing_dir,
            push_tags: true,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_lfs(mut self, has_lfs: bool) -> Self {
        self.has_lfs = has_lfs;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// `--strict-dirs` upgrades the config's policy to `fail`
    pub fn with_strict_dirs(mut self, strict: bool) -> Self {
        if strict {
            self.on_missing_dir = MissingDirPolicy::Fail;
        }
        self
    }

    pub fn with_push_tags(mut self, push: bool) -> Self {
        self.push_tags = push;
        self
    }
}

/// Resolve the configured top_dir to an absolute path
pub fn resolve_top_dir(top_dir: &str, base_dir: &Path) -> PathBuf {
    let path = Path::new(top_dir);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    std::path::absolute(&joined).unwrap_or(joined)
}
