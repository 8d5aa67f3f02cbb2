//! Configuration module for logstash-check.
//!
//! Settings come from environment variables (optionally via `.env`), with an
//! optional TOML file listing several instances to poll.

mod instance_config;
mod observability_config;

pub use instance_config::{InstanceConfig, load_instances, parse_instances};
pub use observability_config::{LogFormat, ObservabilityEnvConfig, SinkKind};

use crate::domain::errors::ConfigError;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub instances: Vec<InstanceConfig>,
    pub sink: SinkKind,
    pub interval: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// Recognized keys: `LOGSTASH_URI`, `CHECK_TIMEOUT_SECS`, `INSTANCE_NAME`,
    /// `CHECK_SINK`, `CHECK_INTERVAL_SECS`, `LOG_FORMAT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout = match lookup("CHECK_TIMEOUT_SECS") {
            Some(v) => Some(Duration::from_secs(
                v.parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidNumber {
                        key: "CHECK_TIMEOUT_SECS".to_string(),
                        value: v,
                    })?,
            )),
            None => None,
        };

        let instance = InstanceConfig::new(
            lookup("INSTANCE_NAME"),
            lookup("LOGSTASH_URI").as_deref(),
            timeout,
        )
        .context("Failed to load instance config")?;

        let observability =
            ObservabilityEnvConfig::from_lookup(&lookup).context("Failed to load output config")?;

        Ok(Self {
            instances: vec![instance],
            sink: observability.sink,
            interval: Duration::from_secs(observability.interval_secs),
            log_format: observability.log_format,
        })
    }

    /// Replace the env-derived instance with the ones listed in `path`.
    pub fn with_instances_file(mut self, path: &Path) -> Result<Self> {
        self.instances = load_instances(path)
            .with_context(|| format!("Failed to load instances from {}", path.display()))?;
        Ok(self)
    }
}
