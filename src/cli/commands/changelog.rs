//! Changelog command implementation

use std::path::PathBuf;
use tracing::debug;

use crate::cli::context::RepoContext;
use crate::cli::repo_iter::{for_each_repo, RepoVisitResult};
use crate::core::error::ReconcileError;
use crate::core::plan::{
    changelog_file_name, head_tags_query, plan_changelog, resolve_changelog_range,
    tags_by_date_query, Mode,
};

/// Generate `<repo_name>-CHANGELOG.rst` in top_dir for every enabled repo
/// with `repo_gen_changes`.
///
/// Changelog text is collected for the whole batch first and the files are
/// written only when every repository succeeded.
pub fn run_changelog(ctx: &RepoContext) -> Result<Vec<PathBuf>, ReconcileError> {
    ctx.check_state(Mode::Changelog)?;
    let exec = ctx.executor();
    let mut pending: Vec<(PathBuf, Vec<u8>)> = Vec::new();

    let repos = ctx.config().enabled_repos().filter(|r| r.gen_changes);
    let summary = for_each_repo(repos, ctx.batch(), |entry| {
        let dir = entry.dir_name();
        if !exec.enter(dir)? {
            return Ok(RepoVisitResult::Skipped("directory missing".into()));
        }

        let tags = exec.capture_lines(&tags_by_date_query(), dir)?;
        let head_tags = exec.capture_lines(&head_tags_query(), dir)?;
        debug!(repo = dir, tags = ?tags, head_tags = ?head_tags, "changelog tags");

        let step = plan_changelog(&resolve_changelog_range(entry, &tags, &head_tags));
        let text = exec.output(&step, dir)?;
        let path = ctx.top_dir().join(changelog_file_name(entry));
        let msg = format!("changelog {}", path.display());
        pending.push((path, text));
        Ok(RepoVisitResult::Success(msg))
    })?;
    summary.check()?;

    let mut written = Vec::with_capacity(pending.len());
    for (path, text) in pending {
        std::fs::write(&path, text)?;
        written.push(path);
    }
    Ok(written)
}
