//! Context passed to command handlers
//!
//! Bundles the active config, resolved options, host binaries and batch
//! flags so every mode handler takes a single argument.

use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

use crate::cli::output::Output;
use crate::cli::repo_iter::BatchPolicy;
use crate::core::config::{Config, LoadedConfig, RepoEntry};
use crate::core::error::ReconcileError;
use crate::core::options::GlobalOptions;
use crate::core::plan::Mode;
use crate::core::state::require_valid;
use crate::git::{Executor, GitHost};

/// Invocation state available to all command handlers.
///
/// Created once in `main()` after loading the config and discovering git.
pub struct RepoContext {
    pub loaded: LoadedConfig,
    pub options: GlobalOptions,
    pub host: GitHost,
    /// Directory the tool was started in; locked configs are written here
    pub cwd: PathBuf,
    /// Continue past failed repositories (`--keep-going`)
    pub keep_going: bool,
}

impl RepoContext {
    pub fn new(loaded: LoadedConfig, host: GitHost, cwd: PathBuf) -> Self {
        let options = GlobalOptions::from_config(&loaded.config, &cwd)
            .with_lfs(host.has_lfs())
            .with_locked(loaded.is_locked());
        Self {
            loaded,
            options,
            host,
            cwd,
            keep_going: false,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.options = self.options.with_quiet(quiet);
        self
    }

    pub fn with_strict_dirs(mut self, strict: bool) -> Self {
        self.options = self.options.with_strict_dirs(strict);
        self
    }

    pub fn with_push_tags(mut self, push: bool) -> Self {
        self.options = self.options.with_push_tags(push);
        self
    }

    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn config(&self) -> &Config {
        &self.loaded.config
    }

    pub fn top_dir(&self) -> &Path {
        &self.options.top_dir
    }

    pub fn quiet(&self) -> bool {
        self.options.quiet
    }

    /// Enabled entries in config order
    pub fn enabled(&self) -> Vec<&RepoEntry> {
        self.config().enabled_repos().collect()
    }

    pub fn executor(&self) -> Executor<'_> {
        Executor::new(&self.host, &self.options.top_dir, self.options.on_missing_dir)
    }

    pub fn batch(&self) -> BatchPolicy {
        BatchPolicy {
            keep_going: self.keep_going,
            quiet: self.options.quiet,
        }
    }

    /// Require a 1:1 mapping between config and top_dir for modes that need it
    pub fn check_state(&self, mode: Mode) -> Result<(), ReconcileError> {
        if mode.requires_valid_state() {
            require_valid(self.top_dir(), &self.config().repos, mode)?;
        }
        Ok(())
    }

    /// A spinner for a long-running step, or nothing when quiet
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        (!self.options.quiet).then(|| Output::spinner(message))
    }
}
