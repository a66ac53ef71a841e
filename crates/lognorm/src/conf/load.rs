//! Load: config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::model::{parse_tz_offset, ParserConfig};
use crate::expr::Network;

const DEFAULT_CONFIG_FILE: &str = "/etc/lognorm/lognorm.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

impl ParserConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("LOGNORM_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_string(),
            source,
        })
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(debug) = env_bool("LOGNORM_DEBUG") {
            self.debug = debug;
        }
        if let Some(ecs) = env_bool("LOGNORM_ECS") {
            self.ecs = ecs;
        }
        if let Some(rsa) = env_bool("LOGNORM_RSA") {
            self.rsa = rsa;
        }
        if let Some(keep_raw) = env_bool("LOGNORM_KEEP_RAW") {
            self.keep_raw = keep_raw;
        }
        if let Ok(tz) = std::env::var("LOGNORM_TZ_OFFSET") {
            self.tz_offset = tz;
        }
    }

    /// Validate offsets, networks and that some output is produced
    pub fn validate(&self) -> Result<(), ConfigError> {
        if parse_tz_offset(&self.tz_offset).is_none() {
            return Err(ConfigError::Invalid(format!(
                "tz_offset must look like +HH:MM, got '{}'",
                self.tz_offset
            )));
        }
        for cidr in &self.local_networks {
            Network::parse(cidr).map_err(|e| ConfigError::Invalid(format!("local_networks: {}", e)))?;
        }
        if !self.ecs && !self.rsa && !self.keep_raw {
            return Err(ConfigError::Invalid(
                "at least one of ecs, rsa or keep_raw must be enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
