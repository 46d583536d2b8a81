//! CLI configuration file support.
//!
//! Supplies default credential settings for the CLI. Resolution order
//! for each setting: command-line flag, then environment variable, then
//! this file, then the built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// On-disk CLI defaults (`config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service-account file used when neither a flag nor the
    /// environment provides one.
    pub service_account_path: Option<PathBuf>,
    /// Default handle name.
    pub app_name: Option<String>,
}

impl Config {
    /// Load from an explicit path, or from the per-user config
    /// directory. A missing file is not an error; defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Per-user config location (`<config dir>/fcm-notify/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "fcm-notify").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
