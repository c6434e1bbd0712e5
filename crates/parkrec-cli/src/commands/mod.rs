//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use parkrec_core::ParkrecConfig;

/// Per-user configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parkrec")
        .join("config.json")
}

/// Resolve configuration: explicit path, then the per-user file, then
/// defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ParkrecConfig> {
    if let Some(path) = config_path {
        return ParkrecConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let user_config = default_config_path();
    if user_config.exists() {
        debug!("Using config file {}", user_config.display());
        return ParkrecConfig::from_file(&user_config)
            .with_context(|| format!("Failed to load config from {}", user_config.display()));
    }

    Ok(ParkrecConfig::default())
}
