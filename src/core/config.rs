//! Config parsing and validation
//!
//! The config file (`.repolite.yml` by default) declares the top-level
//! directory and the ordered list of repositories living under it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default config file name, looked up in the current directory
pub const DEFAULT_CONFIG_NAME: &str = ".repolite.yml";

/// Marker in a config file name that identifies a locked snapshot
pub const LOCKED_MARKER: &str = "locked";

/// Name reported for the built-in example config
pub const EXAMPLE_CONFIG_NAME: &str = "example.yml";

const EXAMPLE_CONFIG: &str = include_str!("../data/example.yml");

/// Errors that can occur when loading or validating a config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Unknown config file extension: {0}")]
    UnknownExtension(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// What to do when a repository directory cannot be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingDirPolicy {
    /// Log the failure with context and skip the rest of that repo's plan
    #[default]
    Warn,
    /// Abort the operation with `ReconcileError::MissingRepoDir`
    Fail,
}

/// One declared repository dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoEntry {
    /// Canonical repository name
    #[serde(rename = "repo_name")]
    pub name: String,
    /// Directory name override
    #[serde(rename = "repo_alias", default)]
    pub alias: Option<String>,
    /// Clone URL or local path (may contain `$VARS` or a leading `~`)
    #[serde(rename = "repo_url")]
    pub url: String,
    /// Clone depth, 0 means full history
    #[serde(rename = "repo_depth", default)]
    pub depth: u32,
    #[serde(rename = "repo_remote", default = "default_remote")]
    pub remote: String,
    #[serde(rename = "repo_branch", default = "default_branch")]
    pub branch: String,
    /// Pinned commit, populated by `lock`
    #[serde(rename = "repo_hash", default)]
    pub hash: Option<String>,
    /// Opaque per-repo options, carried through unchanged
    #[serde(rename = "repo_opts", default)]
    pub opts: Vec<String>,
    /// Force `--rebase=merges` on update even if the global setting is off
    #[serde(rename = "repo_use_rebase", default)]
    pub use_rebase: bool,
    #[serde(rename = "repo_has_lfs_files", default)]
    pub has_lfs_files: bool,
    #[serde(rename = "repo_init_submodules", default)]
    pub init_submodules: bool,
    /// pip-install this repo with `repolite install`
    #[serde(rename = "repo_install", default)]
    pub install: bool,
    #[serde(rename = "repo_enable", default = "default_true")]
    pub enable: bool,
    #[serde(rename = "repo_gen_changes", default)]
    pub gen_changes: bool,
    /// Base tag for a changelog diff
    #[serde(rename = "repo_change_base", default)]
    pub change_base: Option<String>,
    /// Per-repo tag, overrides the tag given on the command line
    #[serde(rename = "repo_create_tag_new", default)]
    pub create_tag_new: Option<String>,
    #[serde(rename = "repo_create_tag_msg", default)]
    pub create_tag_msg: Option<String>,
    #[serde(rename = "repo_create_tag_signed", default)]
    pub create_tag_signed: bool,
    #[serde(rename = "repo_signing_key", default)]
    pub signing_key: Option<String>,
    #[serde(rename = "repo_push_new_tags", default)]
    pub push_new_tags: bool,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_true() -> bool {
    true
}

impl RepoEntry {
    /// Create an enabled entry with defaults for everything but name and url
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            url: url.to_string(),
            depth: 0,
            remote: default_remote(),
            branch: default_branch(),
            hash: None,
            opts: Vec::new(),
            use_rebase: false,
            has_lfs_files: false,
            init_submodules: false,
            install: false,
            enable: true,
            gen_changes: false,
            change_base: None,
            create_tag_new: None,
            create_tag_msg: None,
            create_tag_signed: false,
            signing_key: None,
            push_new_tags: false,
        }
    }

    /// Effective on-disk directory name: the alias if set, else the name.
    pub fn dir_name(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.name,
        }
    }

    /// Whether this is a shallow clone
    pub fn is_shallow(&self) -> bool {
        self.depth > 0
    }
}

/// The parsed config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Informational program name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prog_name: Option<String>,
    /// Directory holding all repository working copies
    pub top_dir: String,
    /// Pull with `--rebase=merges` instead of `--ff-only`
    #[serde(default)]
    pub pull_with_rebase: bool,
    #[serde(default)]
    pub on_missing_dir: MissingDirPolicy,
    /// Repository definitions, in execution order
    pub repos: Vec<RepoEntry>,
}

impl Config {
    /// Load a config from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        check_extension(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a config from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Entries with `repo_enable` set, in config order
    pub fn enabled_repos(&self) -> impl Iterator<Item = &RepoEntry> {
        self.repos.iter().filter(|r| r.enable)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "top_dir must not be empty".to_string(),
            ));
        }

        if self.repos.is_empty() {
            return Err(ConfigError::ValidationError(
                "Config must have at least one repository".to_string(),
            ));
        }

        for repo in &self.repos {
            validate_repo_entry(repo)?;
        }

        let mut seen = HashSet::new();
        for repo in self.enabled_repos() {
            if !seen.insert(repo.dir_name()) {
                return Err(ConfigError::ValidationError(format!(
                    "Directory name '{}' is used by more than one enabled repository",
                    repo.dir_name()
                )));
            }
        }

        Ok(())
    }
}

fn validate_repo_entry(repo: &RepoEntry) -> Result<(), ConfigError> {
    if repo.name.is_empty() {
        return Err(ConfigError::ValidationError(
            "Repository entry is missing repo_name".to_string(),
        ));
    }

    let required = [
        ("repo_url", &repo.url),
        ("repo_remote", &repo.remote),
        ("repo_branch", &repo.branch),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "Repository '{}' must have a {}",
                repo.name, field
            )));
        }
    }

    if !is_single_component(repo.dir_name()) {
        return Err(ConfigError::ValidationError(format!(
            "Repository '{}' directory name is not a plain directory name: {}",
            repo.name,
            repo.dir_name()
        )));
    }

    if repo.create_tag_signed && repo.signing_key.as_deref().unwrap_or("").is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "Repository '{}' wants signed tags but has no repo_signing_key",
            repo.name
        )));
    }

    Ok(())
}

/// A directory name must stay directly under top_dir
fn is_single_component(name: &str) -> bool {
    !(name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\'))
}

/// Reject anything that is not a `.yml` / `.yaml` file
pub fn check_extension(path: &Path) -> Result<(), ConfigError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let lower = name.to_lowercase();
    if lower.ends_with(".yml") || lower.ends_with(".yaml") {
        Ok(())
    } else {
        Err(ConfigError::UnknownExtension(name))
    }
}

/// Whether a config path names a locked snapshot
pub fn is_locked_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().contains(LOCKED_MARKER))
        .unwrap_or(false)
}

/// Where the active config came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// A file on disk
    File,
    /// The built-in example config
    BuiltIn,
}

/// An active config together with its origin
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// Path of the config file (the requested path for a built-in fallback)
    pub path: PathBuf,
    pub source: ConfigSource,
    /// Raw YAML text, used by `config dump` / `config save`
    pub text: String,
}

impl LoadedConfig {
    /// Load the active config.
    ///
    /// `requested` is the `--config` / `REPO_CFG` value; without it
    /// `.repolite.yml` in `cwd` is used. A missing file falls back to the
    /// built-in example, but a bad extension is always an error.
    pub fn locate(requested: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let path = match requested {
            Some(p) if !p.as_os_str().is_empty() => cwd.join(p),
            _ => cwd.join(DEFAULT_CONFIG_NAME),
        };
        check_extension(&path)?;

        if path.is_file() {
            debug!(path = %path.display(), "using config");
            let text = std::fs::read_to_string(&path)?;
            let config = Config::parse(&text)?;
            return Ok(Self {
                config,
                path,
                source: ConfigSource::File,
                text,
            });
        }

        debug!(
            requested = %path.display(),
            "config not found, using built-in example"
        );
        Self::builtin()
    }

    /// The built-in example config
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self {
            config: Config::parse(EXAMPLE_CONFIG)?,
            path: PathBuf::from(EXAMPLE_CONFIG_NAME),
            source: ConfigSource::BuiltIn,
            text: EXAMPLE_CONFIG.to_string(),
        })
    }

    /// Whether the active config is a locked snapshot
    pub fn is_locked(&self) -> bool {
        is_locked_path(&self.path)
    }
}
