//! Show command implementation

use serde::Serialize;

use crate::cli::context::RepoContext;
use crate::cli::output::{Output, Table};
use crate::core::error::ReconcileError;
use crate::core::plan::{branch_query, describe_query, Mode};

/// State of one working copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoShow {
    pub repo: String,
    /// `git describe --tags --dirty --always`
    pub describe: String,
    pub branch: String,
}

/// Describe every enabled repository. Read-only.
pub fn collect_show(ctx: &RepoContext) -> Result<Vec<RepoShow>, ReconcileError> {
    ctx.check_state(Mode::Show)?;

    let exec = ctx.executor();
    let mut shown = Vec::new();
    for entry in ctx.config().enabled_repos() {
        let dir = entry.dir_name();
        if !exec.enter(dir)? {
            continue;
        }
        shown.push(RepoShow {
            repo: dir.to_string(),
            describe: exec.capture(&describe_query(), dir)?,
            branch: exec.capture(&branch_query(), dir)?,
        });
    }
    Ok(shown)
}

/// Run the show command
pub fn run_show(ctx: &RepoContext, json: bool) -> Result<(), ReconcileError> {
    let shown = collect_show(ctx)?;

    if json {
        let text = serde_json::to_string_pretty(&shown)
            .map_err(|e| ReconcileError::Io(std::io::Error::other(e)))?;
        println!("{}", text);
        return Ok(());
    }

    Output::header(&format!("Repositories in {}", ctx.top_dir().display()));
    println!();
    let mut table = Table::new(vec!["Repo", "Describe", "Branch"]);
    for s in &shown {
        table.add_row(vec![
            &Output::repo_name(&s.repo),
            &Output::describe(&s.describe),
            &Output::branch_name(&s.branch),
        ]);
    }
    table.print();
    Ok(())
}
