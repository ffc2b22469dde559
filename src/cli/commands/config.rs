//! Config dump/save

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::config::{LoadedConfig, DEFAULT_CONFIG_NAME};
use crate::core::error::ReconcileError;

/// Write the active config text to `out`
pub fn run_config_dump<W: Write>(loaded: &LoadedConfig, out: &mut W) -> Result<(), ReconcileError> {
    out.write_all(loaded.text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Copy the active config to `.repolite.yml` in `dir`
pub fn run_config_save(loaded: &LoadedConfig, dir: &Path) -> Result<PathBuf, ReconcileError> {
    let path = dir.join(DEFAULT_CONFIG_NAME);
    std::fs::write(&path, &loaded.text)?;
    Ok(path)
}
