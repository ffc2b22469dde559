//! Plan execution
//!
//! Runs planned steps one at a time, synchronously, each with an explicit
//! working directory. The process working directory is never changed.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, error};

use super::{GitError, GitHost};
use crate::core::config::MissingDirPolicy;
use crate::core::error::ReconcileError;
use crate::core::plan::{OperationPlan, PlanStep, StepDir};
use crate::util::log_cmd;

/// How a plan finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Every step succeeded
    Completed,
    /// The repository directory was missing and the policy is `warn`
    Skipped,
}

/// Interpreter for operation plans rooted at one top-level directory
pub struct Executor<'a> {
    host: &'a GitHost,
    top_dir: &'a Path,
    policy: MissingDirPolicy,
}

impl<'a> Executor<'a> {
    pub fn new(host: &'a GitHost, top_dir: &'a Path, policy: MissingDirPolicy) -> Self {
        Self {
            host,
            top_dir,
            policy,
        }
    }

    /// Working copy path for a repository directory name
    pub fn repo_dir(&self, repo: &str) -> PathBuf {
        self.top_dir.join(repo)
    }

    fn step_dir(&self, step: &PlanStep, repo: &str) -> PathBuf {
        match step.dir {
            StepDir::TopDir => self.top_dir.to_path_buf(),
            StepDir::Repo => self.repo_dir(repo),
        }
    }

    /// Check that a repository directory can be entered.
    ///
    /// Returns `Ok(false)` when it is missing and the policy says to warn
    /// and move on.
    pub fn enter(&self, repo: &str) -> Result<bool, ReconcileError> {
        let dir = self.repo_dir(repo);
        if dir.is_dir() {
            return Ok(true);
        }
        match self.policy {
            MissingDirPolicy::Warn => {
                error!(
                    repo,
                    path = %dir.display(),
                    "could not change to repo directory, skipping"
                );
                Ok(false)
            }
            MissingDirPolicy::Fail => Err(ReconcileError::MissingRepoDir(dir)),
        }
    }

    fn command(&self, step: &PlanStep, repo: &str) -> Result<Command, GitError> {
        let program = self.host.program(step.program)?;
        let mut cmd = Command::new(program);
        cmd.args(&step.args).current_dir(self.step_dir(step, repo));
        Ok(cmd)
    }

    /// Run one step and return its raw stdout
    pub fn output(&self, step: &PlanStep, repo: &str) -> Result<Vec<u8>, GitError> {
        let mut cmd = self.command(step, repo)?;
        log_cmd(&cmd);
        let output = cmd.output().map_err(|source| GitError::Spawn {
            command: step.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: step.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!(repo, stderr = %stderr.trim(), "command stderr");
        }
        Ok(output.stdout)
    }

    /// Run one step, discarding its output
    pub fn run(&self, step: &PlanStep, repo: &str) -> Result<(), GitError> {
        let stdout = self.output(step, repo)?;
        let stdout = String::from_utf8_lossy(&stdout);
        if !stdout.trim().is_empty() {
            debug!(repo, stdout = %stdout.trim(), "command output");
        }
        Ok(())
    }

    /// Run one step and return trimmed stdout
    pub fn capture(&self, step: &PlanStep, repo: &str) -> Result<String, GitError> {
        let stdout = self.output(step, repo)?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    /// Run one step and return its non-empty stdout lines
    pub fn capture_lines(&self, step: &PlanStep, repo: &str) -> Result<Vec<String>, GitError> {
        Ok(self
            .capture(step, repo)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Execute a plan in order, abandoning the rest at the first failure
    pub fn execute(&self, plan: &OperationPlan) -> Result<PlanOutcome, ReconcileError> {
        for step in &plan.steps {
            if step.dir == StepDir::Repo && !self.enter(&plan.repo)? {
                return Ok(PlanOutcome::Skipped);
            }
            debug!(repo = %plan.repo, step = %step, "running step");
            self.run(step, &plan.repo)?;
        }
        Ok(PlanOutcome::Completed)
    }
}
