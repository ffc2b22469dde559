//! Update command implementation

use crate::cli::context::RepoContext;
use crate::cli::output::Output;
use crate::cli::repo_iter::{for_each_repo, RepoOpSummary, RepoVisitResult};
use crate::core::error::ReconcileError;
use crate::core::plan::{plan_update, Mode};
use crate::git::PlanOutcome;

/// Bring existing clones up to date.
///
/// A locked config checks out each pinned hash instead of fetching.
/// Every entry is planned before any repository is touched, so a missing
/// pin leaves the whole tree as it was.
pub fn run_update(ctx: &RepoContext) -> Result<RepoOpSummary, ReconcileError> {
    ctx.check_state(Mode::Update)?;
    let repos = ctx.enabled();
    let plans = repos
        .iter()
        .map(|entry| plan_update(entry, &ctx.options))
        .collect::<Result<Vec<_>, _>>()?;
    if !ctx.quiet() {
        let what = if ctx.options.locked {
            "Checking out pinned commits for"
        } else {
            "Updating"
        };
        Output::header(&format!("{} {} repositories...", what, repos.len()));
    }

    let exec = ctx.executor();
    let mut plans = plans.into_iter();
    let summary = for_each_repo(repos, ctx.batch(), |entry| {
        let Some(plan) = plans.next() else {
            return Ok(RepoVisitResult::Skipped("not planned".into()));
        };

        let spinner = ctx.spinner(&format!("Updating {}...", entry.dir_name()));
        let result = exec.execute(&plan);
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        Ok(match result? {
            PlanOutcome::Completed if ctx.options.locked => RepoVisitResult::Success(format!(
                "at {}",
                entry.hash.as_deref().unwrap_or_default()
            )),
            PlanOutcome::Completed => RepoVisitResult::Success(format!(
                "updated {}",
                Output::branch_name(&entry.branch)
            )),
            PlanOutcome::Skipped => RepoVisitResult::Skipped("directory missing".into()),
        })
    })?;
    summary.check()?;
    Ok(summary)
}
