//! Test fixtures for repolite environments.
//!
//! A `RepoliteBuilder` creates bare remotes (offline, `file://` URLs) and a
//! working directory to run repolite from, with `ext/` as top_dir.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use repolite::cli::RepoContext;
use repolite::core::config::{Config, LoadedConfig, RepoEntry};
use repolite::git::GitHost;

use super::git_helpers;

/// Default config file name used by the fixtures
pub const CONFIG_NAME: &str = ".repolite.yml";

/// A test environment cleaned up on drop.
pub struct RepoliteFixture {
    /// Kept alive for the lifetime of the fixture.
    pub _temp: TempDir,
    /// Directory repolite runs from; config files live here
    pub work_dir: PathBuf,
    /// Bare remotes, one `<name>.git` per repo
    pub remotes_dir: PathBuf,
    /// `(name, branch)` for each remote, in config order
    pub repos: Vec<(String, String)>,
}

impl RepoliteFixture {
    pub fn top_dir(&self) -> PathBuf {
        self.work_dir.join("ext")
    }

    /// Working copy of a repo under top_dir
    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.top_dir().join(name)
    }

    pub fn remote_path(&self, name: &str) -> PathBuf {
        self.remotes_dir.join(format!("{}.git", name))
    }

    pub fn remote_url(&self, name: &str) -> String {
        format!("file://{}", self.remote_path(name).display())
    }

    /// A config listing every remote on its branch
    pub fn config(&self) -> Config {
        let mut yaml = String::from("prog_name: repolite\ntop_dir: ext\npull_with_rebase: false\nrepos:\n");
        for (name, branch) in &self.repos {
            yaml.push_str(&format!(
                "  - repo_name: {}\n    repo_url: {}\n    repo_branch: {}\n",
                name,
                self.remote_url(name),
                branch
            ));
        }
        Config::parse(&yaml).expect("fixture config must be valid")
    }

    /// Write `config` as `file_name` in the work dir
    pub fn write_config(&self, file_name: &str, config: &Config) -> PathBuf {
        let path = self.work_dir.join(file_name);
        fs::write(&path, config.to_yaml().unwrap()).unwrap();
        path
    }

    /// Write the default config as `.repolite.yml`
    pub fn write_default_config(&self) -> PathBuf {
        self.write_config(CONFIG_NAME, &self.config())
    }

    pub fn load(&self, file_name: &str) -> LoadedConfig {
        LoadedConfig::locate(Some(Path::new(file_name)), &self.work_dir)
            .expect("fixture config must load")
    }

    /// Quiet context for `file_name` that never pushes tags
    pub fn context(&self, file_name: &str) -> RepoContext {
        let host = GitHost::discover().expect("git must be installed to run the tests");
        RepoContext::new(self.load(file_name), host, self.work_dir.clone())
            .with_quiet(true)
            .with_push_tags(false)
    }

    /// Push a new commit to a remote branch. Returns its sha.
    pub fn push_commit(&self, name: &str, branch: &str, file: &str, message: &str) -> String {
        let staging = self._temp.path().join(format!("staging-{}-{}", name, file));
        git_helpers::clone_repo(&self.remote_url(name), &staging);
        git_helpers::checkout(&staging, branch);
        let sha = git_helpers::commit_file(&staging, file, message, message);
        git_helpers::push_branch(&staging, "origin", branch);
        fs::remove_dir_all(&staging).unwrap();
        sha
    }
}

/// Builder for creating test environments.
pub struct RepoliteBuilder {
    repos: Vec<(String, String)>,
}

impl RepoliteBuilder {
    pub fn new() -> Self {
        Self { repos: Vec::new() }
    }

    /// `daffy` on main and `porky` on branch1
    pub fn looney() -> Self {
        Self::new()
            .add_remote("daffy", "main")
            .add_remote("porky", "branch1")
    }

    /// Add a bare remote whose default config branch is `branch`.
    ///
    /// Every remote has `main`; other branches fork from it with one
    /// extra commit.
    pub fn add_remote(mut self, name: &str, branch: &str) -> Self {
        self.repos.push((name.to_string(), branch.to_string()));
        self
    }

    pub fn build(self) -> RepoliteFixture {
        let temp = TempDir::new().unwrap();
        let work_dir = temp.path().join("work");
        let remotes_dir = temp.path().join("remotes");
        fs::create_dir_all(&work_dir).unwrap();
        fs::create_dir_all(&remotes_dir).unwrap();

        for (name, branch) in &self.repos {
            let bare = remotes_dir.join(format!("{}.git", name));
            git_helpers::init_bare_repo(&bare);

            let seed = temp.path().join(format!("seed-{}", name));
            git_helpers::init_repo(&seed);
            git_helpers::commit_file(&seed, "README.md", &format!("# {}\n", name), "Initial commit");
            git_helpers::add_remote(&seed, "origin", &format!("file://{}", bare.display()));
            git_helpers::push_branch(&seed, "origin", "main");

            if branch != "main" {
                git_helpers::create_branch(&seed, branch);
                git_helpers::commit_file(&seed, "BRANCH.md", branch, &format!("Start {}", branch));
                git_helpers::push_branch(&seed, "origin", branch);
            }
            fs::remove_dir_all(&seed).unwrap();
        }

        RepoliteFixture {
            _temp: temp,
            work_dir,
            remotes_dir,
            repos: self.repos,
        }
    }
}

impl Default for RepoliteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry for a repo not backed by any remote
pub fn bogus_entry(name: &str) -> RepoEntry {
    RepoEntry::new(name, "file:///nonexistent/repo.git")
}
