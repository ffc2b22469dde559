//! Git helper utilities for integration tests.
//!
//! Builds bare remotes and working repos with the `git` CLI, and reads
//! results back with `git2` so assertions never go through the code under
//! test.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

/// Initialize a bare git repository at the given path.
pub fn init_bare_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init", "--bare", "-b", "main"]);
}

/// Initialize a non-bare git repository with user config.
pub fn init_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init", "-b", "main"]);
    configure_identity(path);
}

/// Configure git identity (CI runners may not have global config)
pub fn configure_identity(path: &Path) {
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "tag.gpgSign", "false"]);
}

/// Create a file, stage, and commit it. Returns the commit hash.
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> String {
    fs::write(repo_path.join(filename), content).unwrap();
    git(repo_path, &["add", filename]);
    git(repo_path, &["commit", "-m", message]);
    get_head_sha(repo_path)
}

/// Create and checkout a new branch.
pub fn create_branch(repo_path: &Path, branch_name: &str) {
    git(repo_path, &["checkout", "-b", branch_name]);
}

/// Checkout an existing branch or commit.
pub fn checkout(repo_path: &Path, target: &str) {
    git(repo_path, &["checkout", "-q", target]);
}

/// Push a branch to a remote.
pub fn push_branch(repo_path: &Path, remote: &str, branch: &str) {
    git(repo_path, &["push", "-q", remote, branch]);
}

/// Add a remote to a repository.
pub fn add_remote(repo_path: &Path, name: &str, url: &str) {
    git(repo_path, &["remote", "add", name, url]);
}

/// Create an annotated tag on HEAD.
pub fn create_tag(repo_path: &Path, tag: &str) {
    git(repo_path, &["tag", "-a", tag, "-m", tag]);
}

/// Clone a repository from a URL (typically file://).
pub fn clone_repo(url: &str, dest: &Path) {
    let output = Command::new("git")
        .args(["clone", "-q", url, &dest.to_string_lossy()])
        .output()
        .expect("failed to clone repo");
    assert!(
        output.status.success(),
        "git clone failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    configure_identity(dest);
}

/// Get the current branch name (`HEAD` when detached).
pub fn current_branch(repo_path: &Path) -> String {
    let repo = git2::Repository::open(repo_path).unwrap();
    if repo.head_detached().unwrap() {
        return "HEAD".to_string();
    }
    let name = repo
        .head()
        .unwrap()
        .shorthand()
        .unwrap_or_default()
        .to_string();
    name
}

/// Get HEAD sha.
pub fn get_head_sha(repo_path: &Path) -> String {
    let repo = git2::Repository::open(repo_path).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    head.id().to_string()
}

/// Sha of a branch in a (possibly bare) repository.
pub fn branch_sha(repo_path: &Path, branch: &str) -> String {
    let repo = git2::Repository::open(repo_path).unwrap();
    let reference = repo
        .find_reference(&format!("refs/heads/{}", branch))
        .unwrap();
    let sha = reference.peel_to_commit().unwrap().id().to_string();
    sha
}

/// All tag names in a (possibly bare) repository.
pub fn tag_names(repo_path: &Path) -> Vec<String> {
    let repo = git2::Repository::open(repo_path).unwrap();
    let tags = repo.tag_names(None).unwrap();
    let names = tags.iter().flatten().map(str::to_string).collect();
    names
}

/// Whether HEAD is detached.
pub fn is_detached(repo_path: &Path) -> bool {
    git2::Repository::open(repo_path)
        .unwrap()
        .head_detached()
        .unwrap()
}

/// Whether the working copy is a shallow clone.
pub fn is_shallow(repo_path: &Path) -> bool {
    git2::Repository::open(repo_path).unwrap().is_shallow()
}

/// Run a git command, panic on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Run a git command and return trimmed stdout.
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
