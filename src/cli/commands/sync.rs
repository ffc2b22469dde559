//! Sync command implementation

use tracing::debug;

use crate::cli::context::RepoContext;
use crate::cli::output::Output;
use crate::cli::repo_iter::{for_each_repo, RepoOpSummary, RepoVisitResult};
use crate::core::error::ReconcileError;
use crate::core::plan::{plan_sync, Mode, SyncAction};
use crate::core::repo::repo_path;
use crate::core::state::{validate, DirectoryLayout, StateReport};
use crate::git::PlanOutcome;

/// Clone every enabled repository that is not already in top_dir
pub fn run_sync(ctx: &RepoContext) -> Result<RepoOpSummary, ReconcileError> {
    ctx.check_state(Mode::Sync)?;
    let top_dir = ctx.top_dir();
    std::fs::create_dir_all(top_dir).map_err(|source| ReconcileError::TopDir {
        path: top_dir.to_path_buf(),
        source,
    })?;

    let layout = DirectoryLayout::scan(top_dir)?;
    let report = StateReport::new(&ctx.config().repos, &layout);
    let existing = report.existing_targets();
    debug!(existing = ?existing, "repos already present");

    // anything else sitting on a clone target would be clobbered
    for entry in ctx.config().enabled_repos() {
        let target = repo_path(top_dir, entry);
        if !existing.contains(entry.dir_name()) && target.exists() {
            return Err(ReconcileError::AlreadyExists(target));
        }
    }

    let repos = ctx.enabled();
    if !ctx.quiet() {
        Output::header(&format!("Syncing {} repositories...", repos.len()));
    }

    let exec = ctx.executor();
    let summary = for_each_repo(repos, ctx.batch(), |entry| {
        let plan = match plan_sync(entry, &ctx.options, &existing) {
            SyncAction::Skip => return Ok(RepoVisitResult::Skipped("already cloned".into())),
            SyncAction::Clone(plan) => plan,
        };

        let spinner = ctx.spinner(&format!("Cloning {}...", entry.dir_name()));
        let result = exec.execute(&plan);
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        Ok(match result? {
            PlanOutcome::Completed => RepoVisitResult::Success(format!(
                "cloned on {}",
                Output::branch_name(&entry.branch)
            )),
            PlanOutcome::Skipped => RepoVisitResult::Skipped("clone directory missing".into()),
        })
    })?;
    summary.check()?;

    if !validate(top_dir, &ctx.config().repos)? && !ctx.quiet() {
        Output::info(&format!(
            "{} holds directories that are not enabled repositories",
            top_dir.display()
        ));
    }
    Ok(summary)
}
