//! Custom assertion helpers for repolite integration tests.

#![allow(dead_code)]

use std::path::Path;

use super::git_helpers;

/// Assert that a repo is on the expected branch.
pub fn assert_on_branch(repo_path: &Path, expected: &str) {
    let actual = git_helpers::current_branch(repo_path);
    assert_eq!(
        actual,
        expected,
        "Expected repo at {} to be on branch '{}', but was on '{}'",
        repo_path.display(),
        expected,
        actual
    );
}

/// Assert that a repo sits detached at the given commit.
pub fn assert_detached_at(repo_path: &Path, sha: &str) {
    assert!(
        git_helpers::is_detached(repo_path),
        "Expected repo at {} to have a detached HEAD",
        repo_path.display()
    );
    assert_eq!(git_helpers::get_head_sha(repo_path), sha);
}

/// Assert that a directory is a git working copy.
pub fn assert_is_clone(path: &Path) {
    assert!(
        path.join(".git").exists(),
        "Expected a git working copy at {}",
        path.display()
    );
}

/// Assert that a file exists at the given path.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}

/// Assert that a file does NOT exist at the given path.
pub fn assert_file_not_exists(path: &Path) {
    assert!(
        !path.exists(),
        "Expected file to NOT exist: {}",
        path.display()
    );
}

/// Assert that a tag exists in the repo.
pub fn assert_has_tag(repo_path: &Path, tag: &str) {
    let tags = git_helpers::tag_names(repo_path);
    assert!(
        tags.iter().any(|t| t == tag),
        "Expected tag '{}' in {}, found {:?}",
        tag,
        repo_path.display(),
        tags
    );
}
