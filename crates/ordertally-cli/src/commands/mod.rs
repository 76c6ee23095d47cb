//! Subcommand implementations.

pub mod analyze;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};

use ordertally_core::TallyConfig;

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ordertally")
        .join("config.json")
}

/// Explicit `--config` path, else the user config file if present, else defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<TallyConfig> {
    if let Some(path) = config_path {
        return Ok(TallyConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(TallyConfig::from_file(&default_path)?)
    } else {
        Ok(TallyConfig::default())
    }
}
