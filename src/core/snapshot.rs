//! Locked config snapshots
//!
//! A locked snapshot is a full copy of the active config with every enabled
//! repository's `repo_hash` set to the commit it was at when locked. The
//! file name gets `-locked` inserted before the extension, which is also
//! what marks a config as locked when it is loaded again.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::config::{Config, RepoEntry, LOCKED_MARKER};
use crate::core::error::ReconcileError;

/// `<stem>-locked<.ext>` for a config file name
pub fn locked_file_name(config_path: &Path) -> String {
    let stem = config_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match config_path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, LOCKED_MARKER, ext.to_string_lossy()),
        None => format!("{}-{}", stem, LOCKED_MARKER),
    }
}

/// Path of the locked snapshot for `config_path`, placed in `out_dir`
pub fn locked_path(config_path: &Path, out_dir: &Path) -> PathBuf {
    out_dir.join(locked_file_name(config_path))
}

/// A config being pinned to resolved commits
#[derive(Debug, Clone)]
pub struct LockedSnapshot {
    config: Config,
}

impl LockedSnapshot {
    pub fn from_config(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Record `hash` on the enabled entry living in `dir_name`.
    ///
    /// Returns false if no enabled entry has that directory name.
    pub fn pin(&mut self, dir_name: &str, hash: &str) -> bool {
        match self
            .config
            .repos
            .iter_mut()
            .find(|r| r.enable && r.dir_name() == dir_name)
        {
            Some(entry) => {
                entry.hash = Some(hash.to_string());
                true
            }
            None => false,
        }
    }

    /// `(dir_name, hash)` for every pinned enabled entry, in config order
    pub fn pins(&self) -> Vec<(&str, &str)> {
        pins_of(&self.config.repos)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Serialize to `path`.
    ///
    /// The file is written next to its destination and renamed into place,
    /// so an existing snapshot is replaced whole and never left half written.
    pub fn write_to(&self, path: &Path) -> Result<(), ReconcileError> {
        let yaml = self.config.to_yaml()?;
        let tmp = path.with_extension("tmp");
        let snapshot_err = |source| ReconcileError::Snapshot {
            path: path.to_path_buf(),
            source,
        };
        std::fs::write(&tmp, yaml).map_err(snapshot_err)?;
        std::fs::rename(&tmp, path).map_err(snapshot_err)?;
        debug!(path = %path.display(), "wrote locked config");
        Ok(())
    }
}

/// `(dir_name, hash)` for every enabled entry carrying a hash
pub fn pins_of(repos: &[RepoEntry]) -> Vec<(&str, &str)> {
    repos
        .iter()
        .filter(|r| r.enable)
        .filter_map(|r| r.hash.as_deref().map(|h| (r.dir_name(), h)))
        .collect()
}
