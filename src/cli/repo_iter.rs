//! Repo iteration helpers
//!
//! Every mode walks the enabled entries in config order with the same
//! reporting and the same answer to "what happens when one repo fails".

use tracing::{debug, error};

use crate::cli::output::Output;
use crate::core::config::RepoEntry;
use crate::core::error::ReconcileError;

/// Result of visiting a single repo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoVisitResult {
    /// Operation succeeded with a message
    Success(String),
    /// Nothing to do (already cloned, tag exists, missing directory)
    Skipped(String),
}

/// How a batch reacts to a failed repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Log the failure and move on instead of aborting the batch
    pub keep_going: bool,
    pub quiet: bool,
}

/// Summary of a batch repo operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoOpSummary {
    pub success_count: usize,
    pub skip_count: usize,
    pub error_count: usize,
}

impl RepoOpSummary {
    pub fn total(&self) -> usize {
        self.success_count + self.skip_count + self.error_count
    }

    /// `BatchFailed` if any repository failed
    pub fn check(&self) -> Result<(), ReconcileError> {
        if self.error_count > 0 {
            return Err(ReconcileError::BatchFailed {
                failed: self.error_count,
                total: self.total(),
            });
        }
        Ok(())
    }
}

/// Visit each entry with `op`.
///
/// The first error aborts the batch unless `policy.keep_going` is set, in
/// which case it is reported and counted. Call `check` on the summary to
/// turn counted failures into an error.
pub fn for_each_repo<'a, I, F>(
    repos: I,
    policy: BatchPolicy,
    mut op: F,
) -> Result<RepoOpSummary, ReconcileError>
where
    I: IntoIterator<Item = &'a RepoEntry>,
    F: FnMut(&'a RepoEntry) -> Result<RepoVisitResult, ReconcileError>,
{
    let mut summary = RepoOpSummary::default();

    for entry in repos {
        match op(entry) {
            Ok(RepoVisitResult::Success(msg)) => {
                debug!(repo = entry.dir_name(), "{}", msg);
                if !policy.quiet {
                    Output::success(&format!("{}: {}", Output::repo_name(entry.dir_name()), msg));
                }
                summary.success_count += 1;
            }
            Ok(RepoVisitResult::Skipped(msg)) => {
                if !policy.quiet {
                    Output::info(&format!("{}: {}", Output::repo_name(entry.dir_name()), msg));
                }
                summary.skip_count += 1;
            }
            Err(e) if policy.keep_going => {
                error!(repo = entry.dir_name(), error = %e, "repository failed");
                Output::error(&format!("{}: {}", entry.dir_name(), e));
                summary.error_count += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}
