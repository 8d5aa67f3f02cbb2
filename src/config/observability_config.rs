//! Output configuration parsing from environment variables.
//!
//! This module decides where collected metrics go and how the runner logs.

use crate::domain::errors::ConfigError;
use std::str::FromStr;

/// Destination for gauges and service checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Structured log events
    Log,
    /// Prometheus registry, rendered after each run
    Prometheus,
}

impl FromStr for SinkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(SinkKind::Log),
            "prometheus" => Ok(SinkKind::Prometheus),
            _ => Err(ConfigError::InvalidSink(s.to_string())),
        }
    }
}

/// Log line format of the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub sink: SinkKind,
    pub interval_secs: u64,
    pub log_format: LogFormat,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::Log,
            interval_secs: 15,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sink = match lookup("CHECK_SINK") {
            Some(s) => s.parse::<SinkKind>()?,
            None => defaults.sink,
        };

        let interval_secs = match lookup("CHECK_INTERVAL_SECS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNumber {
                    key: "CHECK_INTERVAL_SECS".to_string(),
                    value: v,
                })?,
            None => defaults.interval_secs,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            sink,
            interval_secs,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_observability_config_defaults() {
        let config = ObservabilityEnvConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.sink, SinkKind::Log);
        assert_eq!(config.interval_secs, 15);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_observability_config_overrides() {
        let config = ObservabilityEnvConfig::from_lookup(lookup(&[
            ("CHECK_SINK", "Prometheus"),
            ("CHECK_INTERVAL_SECS", "60"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.sink, SinkKind::Prometheus);
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(matches!(
            ObservabilityEnvConfig::from_lookup(lookup(&[("CHECK_INTERVAL_SECS", "0")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_unknown_sink_is_rejected() {
        assert!(matches!(
            ObservabilityEnvConfig::from_lookup(lookup(&[("CHECK_SINK", "statsd")])),
            Err(ConfigError::InvalidSink(_))
        ));
    }
}
