//! Lock command implementation

use std::path::PathBuf;

use crate::cli::context::RepoContext;
use crate::cli::output::Output;
use crate::cli::repo_iter::{for_each_repo, RepoVisitResult};
use crate::core::error::ReconcileError;
use crate::core::plan::{head_query, plan_lock_checkout, Mode};
use crate::core::snapshot::{locked_path, LockedSnapshot};
use crate::git::PlanOutcome;

/// Pin every enabled repository at its current HEAD and write a locked
/// copy of the config next to where the tool was run.
///
/// Each working copy is also checked out (detached) at the recorded hash.
/// The file is written only after every repository succeeded.
pub fn run_lock(ctx: &RepoContext) -> Result<PathBuf, ReconcileError> {
    ctx.check_state(Mode::Lock)?;

    let exec = ctx.executor();
    let mut snapshot = LockedSnapshot::from_config(ctx.config());
    let summary = for_each_repo(ctx.enabled(), ctx.batch(), |entry| {
        let dir = entry.dir_name();
        if !exec.enter(dir)? {
            return Ok(RepoVisitResult::Skipped("directory missing".into()));
        }
        let hash = exec.capture(&head_query(), dir)?;
        snapshot.pin(dir, &hash);

        match exec.execute(&plan_lock_checkout(entry, &hash, &ctx.options))? {
            PlanOutcome::Completed => Ok(RepoVisitResult::Success(format!("locked at {}", hash))),
            PlanOutcome::Skipped => Ok(RepoVisitResult::Skipped("directory missing".into())),
        }
    })?;
    summary.check()?;

    let path = locked_path(&ctx.loaded.path, &ctx.cwd);
    snapshot.write_to(&path)?;
    if !ctx.quiet() {
        Output::success(&format!("Wrote {}", path.display()));
    }
    Ok(path)
}
