//! Install command implementation

use tracing::info;

use crate::cli::context::RepoContext;
use crate::cli::repo_iter::{for_each_repo, RepoOpSummary, RepoVisitResult};
use crate::core::error::ReconcileError;
use crate::core::plan::{pip_freeze_query, plan_install, Mode};
use crate::core::repo::repo_path;

/// `pip install` every enabled repository with `repo_install`
pub fn run_install(ctx: &RepoContext) -> Result<RepoOpSummary, ReconcileError> {
    ctx.check_state(Mode::Install)?;
    let exec = ctx.executor();
    let repos = ctx.config().enabled_repos().filter(|r| r.install);
    let summary = for_each_repo(repos, ctx.batch(), |entry| {
        let path = repo_path(ctx.top_dir(), entry);
        let spinner = ctx.spinner(&format!("Installing {}...", entry.dir_name()));
        let result = exec.run(&plan_install(&path), entry.dir_name());
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        result?;

        if !ctx.quiet() {
            let packages: Vec<String> = exec
                .capture_lines(&pip_freeze_query(), entry.dir_name())?
                .into_iter()
                .map(|l| l.split('@').next().unwrap_or_default().trim().to_string())
                .collect();
            info!(repo = entry.dir_name(), packages = ?packages, "installed dependencies");
        }
        Ok(RepoVisitResult::Success(format!("installed {}", path.display())))
    })?;
    summary.check()?;
    Ok(summary)
}
