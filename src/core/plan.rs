//! Command planning
//!
//! Turns a repository entry plus global options into the ordered list of
//! external commands to run for it. Planning is pure: it never touches the
//! filesystem or spawns a process, so every decision here is unit-testable.
//! Modes that depend on repository facts (current HEAD, existing tags)
//! take those facts as arguments; the caller queries them first with the
//! query steps defined at the bottom of this module.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::core::config::RepoEntry;
use crate::core::error::ReconcileError;
use crate::core::options::GlobalOptions;
use crate::core::repo::expand_url;

/// User-facing operation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Sync,
    Update,
    Lock,
    Tag,
    Show,
    Changelog,
    Install,
}

impl Mode {
    /// Modes that need a 1:1 mapping between config and top_dir
    pub fn requires_valid_state(self) -> bool {
        matches!(self, Mode::Lock | Mode::Tag | Mode::Show)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Sync => "sync",
            Mode::Update => "update",
            Mode::Lock => "lock",
            Mode::Tag => "tag",
            Mode::Show => "show",
            Mode::Changelog => "changelog",
            Mode::Install => "install",
        };
        write!(f, "{}", s)
    }
}

/// External program a step runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Program {
    Git,
    Gitchangelog,
    Python,
}

impl Program {
    pub fn name(self) -> &'static str {
        match self {
            Program::Git => "git",
            Program::Gitchangelog => "gitchangelog",
            Program::Python => "python",
        }
    }
}

/// Working directory a step runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDir {
    /// The top-level directory (clones, installs)
    TopDir,
    /// The repository's own working copy
    Repo,
}

/// One external command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    pub program: Program,
    pub args: Vec<String>,
    pub dir: StepDir,
}

impl PlanStep {
    /// A git command run inside the repository
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: Program::Git,
            args: args.into_iter().map(Into::into).collect(),
            dir: StepDir::Repo,
        }
    }

    /// Run this step in top_dir instead of the repository
    pub fn in_top_dir(mut self) -> Self {
        self.dir = StepDir::TopDir;
        self
    }

    /// The git subcommand (first argument), if any
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.name())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Ordered steps for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationPlan {
    /// Effective directory name of the repository
    pub repo: String,
    pub steps: Vec<PlanStep>,
}

impl OperationPlan {
    pub fn new(repo: &str) -> Self {
        Self {
            repo: repo.to_string(),
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: PlanStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: PlanStep) {
        self.steps.push(step);
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether any step runs the given git subcommand
    pub fn runs(&self, subcommand: &str) -> bool {
        self.steps
            .iter()
            .any(|s| s.program == Program::Git && s.subcommand() == Some(subcommand))
    }
}

/// How `update` pulls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PullStrategy {
    RebaseMerges,
    FastForwardOnly,
}

impl PullStrategy {
    /// A repo override can only strengthen fast-forward to rebase, never weaken it
    pub fn resolve(global_rebase: bool, repo_use_rebase: bool) -> Self {
        if global_rebase || repo_use_rebase {
            PullStrategy::RebaseMerges
        } else {
            PullStrategy::FastForwardOnly
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            PullStrategy::RebaseMerges => "--rebase=merges",
            PullStrategy::FastForwardOnly => "--ff-only",
        }
    }
}

/// What sync should do with one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Already cloned and accounted for
    Skip,
    Clone(OperationPlan),
}

fn checkout(target: &str, opts: &GlobalOptions) -> PlanStep {
    if opts.quiet {
        PlanStep::git(["checkout", "-q", target])
    } else {
        PlanStep::git(["checkout", target])
    }
}

/// Plan a sync for one entry.
///
/// `existing` is the intersection of expected names and the subdirectories
/// currently in top_dir; entries in it are skipped rather than re-cloned.
pub fn plan_sync(entry: &RepoEntry, opts: &GlobalOptions, existing: &BTreeSet<String>) -> SyncAction {
    let dir = entry.dir_name();
    if existing.contains(dir) {
        debug!(repo = dir, "skipping existing repo");
        return SyncAction::Skip;
    }

    let mut clone = vec!["clone".to_string()];
    if opts.quiet {
        clone.push("-q".to_string());
    }
    // shallow clones pin the branch at clone time, full clones check it out after
    if entry.is_shallow() {
        clone.push("-b".to_string());
        clone.push(entry.branch.clone());
        clone.push("--depth".to_string());
        clone.push(entry.depth.to_string());
    }
    clone.push(expand_url(&entry.url));
    clone.push(dir.to_string());

    let mut plan = OperationPlan::new(dir)
        .with_step(PlanStep::git(clone).in_top_dir())
        .with_step(checkout(&entry.branch, opts));

    if entry.init_submodules {
        plan.push(PlanStep::git(["submodule", "update", "--init", "--recursive"]));
    }

    if entry.has_lfs_files {
        if opts.has_lfs {
            plan.push(PlanStep::git(["lfs", "install"]));
        } else {
            debug!(repo = dir, "cannot initialize large files, git-lfs not found");
        }
    }

    SyncAction::Clone(plan)
}

/// Plan an update for one existing clone.
///
/// A locked config checks out the pinned hash and nothing else.
pub fn plan_update(entry: &RepoEntry, opts: &GlobalOptions) -> Result<OperationPlan, ReconcileError> {
    let dir = entry.dir_name();

    if opts.locked {
        let hash = entry
            .hash
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ReconcileError::MissingPin(entry.name.clone()))?;
        return Ok(OperationPlan::new(dir).with_step(checkout(hash, opts)));
    }

    let strategy = PullStrategy::resolve(opts.pull_with_rebase, entry.use_rebase);
    let mut plan = OperationPlan::new(dir)
        .with_step(PlanStep::git(["fetch", "--tags", entry.remote.as_str()]))
        .with_step(checkout(&entry.branch, opts))
        .with_step(PlanStep::git([
            "pull",
            strategy.flag(),
            entry.remote.as_str(),
            entry.branch.as_str(),
        ]));

    if entry.init_submodules {
        plan.push(PlanStep::git(["submodule", "update", "--recursive"]));
    }

    Ok(plan)
}

/// Re-checkout the resolved HEAD so the working copy sits detached at it
pub fn plan_lock_checkout(entry: &RepoEntry, hash: &str, opts: &GlobalOptions) -> OperationPlan {
    OperationPlan::new(entry.dir_name()).with_step(checkout(hash, opts))
}

/// Tag to apply to an entry: its own override first, then the global one
pub fn resolve_tag<'a>(entry: &'a RepoEntry, global_tag: Option<&'a str>) -> Option<&'a str> {
    entry
        .create_tag_new
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(global_tag.filter(|t| !t.is_empty()))
}

/// Plan tag creation; `None` when the tag already exists.
pub fn plan_tag(
    entry: &RepoEntry,
    tag: &str,
    existing_tags: &[String],
    opts: &GlobalOptions,
) -> Option<OperationPlan> {
    if existing_tags.iter().any(|t| t == tag) {
        debug!(repo = entry.dir_name(), tag, "tag already exists");
        return None;
    }

    let message = entry
        .create_tag_msg
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(tag);
    let mut plan = OperationPlan::new(entry.dir_name());

    if entry.create_tag_signed {
        let key = entry.signing_key.as_deref().unwrap_or_default();
        plan.push(PlanStep::git(["config", "user.signingkey", key]));
        plan.push(PlanStep::git(["tag", "-s", tag, "-m", message]));
    } else {
        plan.push(PlanStep::git(["tag", "-a", tag, "-m", message]));
    }

    if entry.push_new_tags && opts.push_tags {
        plan.push(PlanStep::git(["push", "--tags", entry.remote.as_str()]));
    }

    Some(plan)
}

/// Commit range handed to gitchangelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogRange {
    /// Whole history
    Full,
    /// `<base>..<head>`
    Diff { base: String, head: String },
}

/// Pick the changelog range for an entry.
///
/// The newest tag (tagger-date order) only counts as the current release
/// when it also points at HEAD; otherwise the range ends at HEAD.
pub fn resolve_changelog_range(
    entry: &RepoEntry,
    tags_by_date: &[String],
    head_tags: &[String],
) -> ChangelogRange {
    let current = tags_by_date
        .last()
        .filter(|t| head_tags.contains(*t))
        .cloned()
        .unwrap_or_else(|| "HEAD".to_string());

    match entry.change_base.as_deref().filter(|b| !b.is_empty()) {
        Some(base) => ChangelogRange::Diff {
            base: base.to_string(),
            head: current,
        },
        None => ChangelogRange::Full,
    }
}

/// gitchangelog invocation for a range, run inside the repository
pub fn plan_changelog(range: &ChangelogRange) -> PlanStep {
    let args = match range {
        ChangelogRange::Full => Vec::new(),
        ChangelogRange::Diff { base, head } => vec![format!("{}..{}", base, head)],
    };
    PlanStep {
        program: Program::Gitchangelog,
        args,
        dir: StepDir::Repo,
    }
}

/// Output file for an entry's changelog
pub fn changelog_file_name(entry: &RepoEntry) -> String {
    format!("{}-CHANGELOG.rst", entry.name)
}

/// `python -m pip install <path>` for a cloned repository
pub fn plan_install(repo_path: &Path) -> PlanStep {
    PlanStep {
        program: Program::Python,
        args: vec![
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            repo_path.display().to_string(),
        ],
        dir: StepDir::TopDir,
    }
}

/// `pip freeze`, used to report installed packages
pub fn pip_freeze_query() -> PlanStep {
    PlanStep {
        program: Program::Python,
        args: vec!["-m".into(), "pip".into(), "freeze".into()],
        dir: StepDir::TopDir,
    }
}

/// Resolve the current commit
pub fn head_query() -> PlanStep {
    PlanStep::git(["rev-parse", "--verify", "HEAD"])
}

/// All tag names
pub fn tag_list_query() -> PlanStep {
    PlanStep::git(["tag", "-l"])
}

/// Tags ordered by tagger date, oldest first
pub fn tags_by_date_query() -> PlanStep {
    PlanStep::git(["tag", "--sort=taggerdate"])
}

/// Tags pointing at HEAD
pub fn head_tags_query() -> PlanStep {
    PlanStep::git(["tag", "--points-at", "HEAD"])
}

/// Nearest tag plus dirty marker, falling back to an abbreviated hash
pub fn describe_query() -> PlanStep {
    PlanStep::git(["describe", "--tags", "--dirty", "--always"])
}

/// Current branch name (`HEAD` when detached)
pub fn branch_query() -> PlanStep {
    PlanStep::git(["rev-parse", "--abbrev-ref", "HEAD"])
}
