//! Configuration management for the CLI
//!
//! Defaults live in `~/.config/rightsize/config.json`; command-line flags
//! override them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub region: Option<String>,
    /// JSON price overrides layered over the built-in table
    pub price_file: Option<PathBuf>,
    pub target_low: Option<f64>,
    pub target_high: Option<f64>,
    pub default_format: Option<String>,
}

impl Config {
    /// Load from `path`, or the default location when `None`
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("rightsize").join("config.json"))
    }
}
