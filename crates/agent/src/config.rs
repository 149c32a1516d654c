//! Agent configuration
//!
//! Sources, later ones winning:
//! - built-in defaults
//! - optional `rightsize.toml` (or the file named by `RIGHTSIZE_CONFIG`)
//! - `RIGHTSIZE_*` environment variables, `__` separating nested keys
//!   (`RIGHTSIZE_RECOMMENDER__TARGET_LOW=35`)

use anyhow::{Context, Result};
use rightsize_lib::RecommenderConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "rightsize.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Name attached to structured log records
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Port for the API, health and metrics endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Region used when a request does not name one
    #[serde(default = "default_region")]
    pub region: String,

    /// JSON price overrides layered over the built-in table
    #[serde(default)]
    pub price_file: Option<PathBuf>,

    /// Upper bound on concurrently sized batch items
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    #[serde(default)]
    pub recommender: RecommenderConfig,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "rightsize-agent".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_region() -> String {
    "ap-northeast-1".to_string()
}

fn default_batch_concurrency() -> usize {
    8
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            region: default_region(),
            price_file: None,
            batch_concurrency: default_batch_concurrency(),
            recommender: RecommenderConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from the config file and environment
    pub fn load() -> Result<Self> {
        let file = std::env::var("RIGHTSIZE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from(Path::new(&file))
    }

    pub fn load_from(file: &Path) -> Result<Self> {
        let config: AgentConfig = config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(
                config::Environment::with_prefix("RIGHTSIZE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .recommender
            .validate()
            .context("Invalid recommender configuration")?;

        Ok(config)
    }
}
