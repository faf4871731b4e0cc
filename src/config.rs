// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{ArchiveError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
    /// Quiet period before a search/filter change triggers a list fetch.
    pub debounce_ms: u64,
    /// Number of placeholder blocks shown while the list is loading.
    pub placeholder_count: usize,
}

fn default_user_agent() -> String {
    format!("doc_archive/{}", env!("CARGO_PKG_VERSION"))
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ArchiveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            placeholder_count: 8,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("DOC_ARCHIVE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ArchiveError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ArchiveError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_secs: 30,
                user_agent: default_user_agent(),
            },
            archive: ArchiveConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.api.base_url)
            .map_err(|e| ArchiveError::Config(e.to_string()))?;

        if self.api.timeout_secs == 0 {
            return Err(ArchiveError::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.archive.placeholder_count == 0 {
            return Err(ArchiveError::Config(
                "archive.placeholder_count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
