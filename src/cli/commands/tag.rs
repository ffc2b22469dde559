//! Tag command implementation

use crate::cli::context::RepoContext;
use crate::cli::repo_iter::{for_each_repo, RepoOpSummary, RepoVisitResult};
use crate::core::error::ReconcileError;
use crate::core::plan::{plan_tag, resolve_tag, tag_list_query, Mode};
use crate::git::PlanOutcome;

/// Apply `tag` (or each repo's own `repo_create_tag_new`) to every enabled
/// repository that does not already have it
pub fn run_tag(ctx: &RepoContext, tag: Option<&str>) -> Result<RepoOpSummary, ReconcileError> {
    ctx.check_state(Mode::Tag)?;

    let exec = ctx.executor();
    let summary = for_each_repo(ctx.enabled(), ctx.batch(), |entry| {
        let Some(new_tag) = resolve_tag(entry, tag) else {
            return Ok(RepoVisitResult::Skipped("no tag given".into()));
        };
        let dir = entry.dir_name();
        if !exec.enter(dir)? {
            return Ok(RepoVisitResult::Skipped("directory missing".into()));
        }

        let existing = exec.capture_lines(&tag_list_query(), dir)?;
        let Some(plan) = plan_tag(entry, new_tag, &existing, &ctx.options) else {
            return Ok(RepoVisitResult::Skipped(format!("tag {} already exists", new_tag)));
        };

        Ok(match exec.execute(&plan)? {
            PlanOutcome::Completed if plan.runs("push") => {
                RepoVisitResult::Success(format!("tagged {} and pushed to {}", new_tag, entry.remote))
            }
            PlanOutcome::Completed => RepoVisitResult::Success(format!("tagged {}", new_tag)),
            PlanOutcome::Skipped => RepoVisitResult::Skipped("directory missing".into()),
        })
    })?;
    summary.check()?;
    Ok(summary)
}
