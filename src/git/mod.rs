//! Git host discovery and command execution
//!
//! Every repository operation shells out to the system `git` binary. The
//! binaries are located once per invocation; the executor then runs
//! planned steps with an explicit working directory.

pub mod exec;

pub use exec::{Executor, PlanOutcome};

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::core::plan::Program;

/// Errors that can occur while running external commands
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Cannot continue, no path found for {0}")]
    NotFound(String),

    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed ({status}){}", format_stderr(.stderr))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

/// External binaries found on this host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHost {
    pub git: PathBuf,
    /// `git-lfs`, optional
    pub lfs: Option<PathBuf>,
    /// `python3` or `python`, needed only by `install`
    pub python: Option<PathBuf>,
    /// `gitchangelog`, needed only by `changelog`
    pub gitchangelog: Option<PathBuf>,
}

impl GitHost {
    /// Locate the binaries on `PATH`. A missing `git` is fatal.
    pub fn discover() -> Result<Self, GitError> {
        let git = which::which("git").map_err(|_| GitError::NotFound("git".to_string()))?;
        let lfs = which::which("git-lfs").ok();
        if lfs.is_none() {
            debug!("cannot initialize large files, git-lfs not found");
        }
        let python = which::which("python3")
            .or_else(|_| which::which("python"))
            .ok();
        let gitchangelog = which::which("gitchangelog").ok();

        debug!(git = %git.display(), lfs = ?lfs, "found git binaries");
        Ok(Self {
            git,
            lfs,
            python,
            gitchangelog,
        })
    }

    /// Whether large-file support is available
    pub fn has_lfs(&self) -> bool {
        self.lfs.is_some()
    }

    /// Path of the binary for a planned step
    pub fn program(&self, program: Program) -> Result<PathBuf, GitError> {
        let found = match program {
            Program::Git => Some(self.git.clone()),
            Program::Python => self.python.clone(),
            Program::Gitchangelog => self.gitchangelog.clone(),
        };
        found.ok_or_else(|| GitError::NotFound(program.name().to_string()))
    }
}
