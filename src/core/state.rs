//! Repository state inspection
//!
//! Compares the configured repository set with the directories actually
//! present under top_dir. State is valid only on strict set equality:
//! a missing or an extra directory both invalidate it.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::config::RepoEntry;
use crate::core::error::ReconcileError;
use crate::core::plan::Mode;
use crate::core::repo::enabled_dir_names;

/// Subdirectory names present under top_dir, sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryLayout {
    names: Vec<String>,
}

impl DirectoryLayout {
    /// List the immediate subdirectories of `top_dir`
    pub fn scan(top_dir: &Path) -> Result<Self, ReconcileError> {
        let entries = std::fs::read_dir(top_dir).map_err(|source| ReconcileError::TopDir {
            path: top_dir.to_path_buf(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(Self { names })
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }
}

/// Expected vs. actual directory names at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateReport {
    /// Effective names of enabled entries, sorted
    pub expected: Vec<String>,
    /// Subdirectories of top_dir, sorted
    pub actual: Vec<String>,
}

impl StateReport {
    pub fn new(repos: &[RepoEntry], layout: &DirectoryLayout) -> Self {
        let mut expected = enabled_dir_names(repos);
        expected.sort();
        Self {
            expected,
            actual: layout.names().to_vec(),
        }
    }

    /// Strict equality of the sorted name lists
    pub fn is_valid(&self) -> bool {
        self.expected == self.actual
    }

    /// Configured but absent
    pub fn missing(&self) -> Vec<&str> {
        self.expected
            .iter()
            .filter(|n| !self.actual.contains(n))
            .map(String::as_str)
            .collect()
    }

    /// Present but not configured
    pub fn extra(&self) -> Vec<&str> {
        self.actual
            .iter()
            .filter(|n| !self.expected.contains(n))
            .map(String::as_str)
            .collect()
    }

    /// Names both configured and present; these are skipped by sync
    pub fn existing_targets(&self) -> BTreeSet<String> {
        self.expected
            .iter()
            .filter(|n| self.actual.contains(n))
            .cloned()
            .collect()
    }
}

/// Inspect the current layout of `top_dir` against `repos`
pub fn inspect(top_dir: &Path, repos: &[RepoEntry]) -> Result<StateReport, ReconcileError> {
    debug!(top_dir = %top_dir.display(), "inspecting top-level repo dir");
    let layout = DirectoryLayout::scan(top_dir)?;
    Ok(StateReport::new(repos, &layout))
}

/// Whether the layout under `top_dir` matches `repos` one to one
pub fn validate(top_dir: &Path, repos: &[RepoEntry]) -> Result<bool, ReconcileError> {
    let report = inspect(top_dir, repos)?;
    let valid = report.is_valid();
    if !valid {
        warn!(
            expected = ?report.expected,
            actual = ?report.actual,
            "invalid state: configured repositories do not match top_dir"
        );
    }
    Ok(valid)
}

/// Fail with `DirectoryMismatch` unless the state is valid
pub fn require_valid(top_dir: &Path, repos: &[RepoEntry], mode: Mode) -> Result<(), ReconcileError> {
    let report = inspect(top_dir, repos)?;
    if report.is_valid() {
        return Ok(());
    }
    warn!(
        expected = ?report.expected,
        actual = ?report.actual,
        "invalid state: configured repositories do not match top_dir"
    );
    Err(ReconcileError::DirectoryMismatch(format!(
        "cannot {} with mismatched directories (missing: {:?}, extra: {:?})",
        mode,
        report.missing(),
        report.extra()
    )))
}
