//! Reconciliation error conditions
//!
//! Planning-phase conditions (state mismatch, pre-existing directory) get
//! their own variants so callers can report them and exit cleanly.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::config::ConfigError;
use crate::git::GitError;

#[derive(Error, Debug)]
pub enum ReconcileError {
    /// Configured repositories and top_dir subdirectories disagree
    #[error("Directory mismatch: {0}")]
    DirectoryMismatch(String),

    /// A clone target exists but is not accounted for by the config
    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Could not change to repo directory: {}", .0.display())]
    MissingRepoDir(PathBuf),

    /// Locked config without a pinned hash for an enabled repo
    #[error("Repository '{0}' has no repo_hash in a locked config")]
    MissingPin(String),

    #[error("Could not use top-level repo dir {}: {source}", .path.display())]
    TopDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write locked config {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} repositories failed")]
    BatchFailed { failed: usize, total: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReconcileError {
    /// Whether this condition was raised before any repository was touched
    pub fn is_planning_error(&self) -> bool {
        matches!(
            self,
            ReconcileError::DirectoryMismatch(_)
                | ReconcileError::AlreadyExists(_)
                | ReconcileError::MissingPin(_)
                | ReconcileError::Config(_)
        )
    }
}
