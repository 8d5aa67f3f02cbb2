//! Per-instance settings, from the environment or a TOML instances file.
//!
//! ```toml
//! [[instances]]
//! name = "ingest-1"
//! logstash_uri = "http://ingest-1:9600"
//! timeout_secs = 5
//! tags = { env = "prod" }
//! ```

use crate::domain::errors::ConfigError;
use crate::domain::logstash::{CHECK_TIMEOUT, DEFAULT_LOGSTASH_URI};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// One monitored Logstash node
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceConfig {
    pub name: String,
    pub logstash_uri: Url,
    pub timeout: Duration,
    pub tags: BTreeMap<String, String>,
}

impl InstanceConfig {
    /// Build an instance, falling back to the default address and timeout.
    pub fn new(
        name: Option<String>,
        logstash_uri: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let logstash_uri = parse_uri(logstash_uri.unwrap_or(DEFAULT_LOGSTASH_URI))?;
        if timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::InvalidNumber {
                key: "timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(Self {
            name: name.unwrap_or_else(|| default_name(&logstash_uri)),
            logstash_uri,
            timeout: timeout.unwrap_or(CHECK_TIMEOUT),
            tags: BTreeMap::new(),
        })
    }

    /// Tags as `key:value` pairs joined by commas, e.g. `env:prod,team:ops`
    pub fn tag_list(&self) -> String {
        self.tags
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        let logstash_uri = Url::parse(DEFAULT_LOGSTASH_URI).expect("Default logstash_uri is valid");
        Self {
            name: default_name(&logstash_uri),
            logstash_uri,
            timeout: CHECK_TIMEOUT,
            tags: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInstance {
    name: Option<String>,
    logstash_uri: Option<String>,
    timeout_secs: Option<u64>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstancesFile {
    #[serde(default)]
    instances: Vec<RawInstance>,
}

/// Parse an instances document. An empty list yields one default instance.
pub fn parse_instances(source: &str, path: &str) -> Result<Vec<InstanceConfig>, ConfigError> {
    let file: InstancesFile = toml::from_str(source).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;

    if file.instances.is_empty() {
        return Ok(vec![InstanceConfig::default()]);
    }

    file.instances
        .into_iter()
        .map(|raw| {
            let mut instance = InstanceConfig::new(
                raw.name,
                raw.logstash_uri.as_deref(),
                raw.timeout_secs.map(Duration::from_secs),
            )?;
            instance.tags = raw.tags;
            Ok(instance)
        })
        .collect()
}

/// Read and parse an instances file from disk
pub fn load_instances(path: &Path) -> Result<Vec<InstanceConfig>, ConfigError> {
    let display = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    parse_instances(&source, &display)
}

fn parse_uri(uri: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(uri).map_err(|e| ConfigError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUri {
            uri: uri.to_string(),
            reason: "expected an http(s) base address".to_string(),
        });
    }
    Ok(url)
}

fn default_name(uri: &Url) -> String {
    match (uri.host_str(), uri.port_or_known_default()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instance() {
        let instance = InstanceConfig::default();
        assert_eq!(instance.logstash_uri.as_str(), "http://localhost:9600/");
        assert_eq!(instance.timeout, Duration::from_secs(10));
        assert_eq!(instance.name, "localhost:9600");
    }

    #[test]
    fn test_parse_instances_file() {
        let source = r#"
            [[instances]]
            name = "ingest"
            logstash_uri = "http://ingest-1:9600"
            timeout_secs = 3
            tags = { env = "prod" }

            [[instances]]
        "#;

        let instances = parse_instances(source, "instances.toml").unwrap();

        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].name, "ingest");
        assert_eq!(instances[0].timeout, Duration::from_secs(3));
        assert_eq!(instances[0].tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(instances[1].logstash_uri.as_str(), "http://localhost:9600/");
    }

    #[test]
    fn test_empty_file_yields_default_instance() {
        let instances = parse_instances("", "instances.toml").unwrap();
        assert_eq!(instances, vec![InstanceConfig::default()]);
    }

    #[test]
    fn test_invalid_uri_is_rejected() {
        let source = r#"
            [[instances]]
            logstash_uri = "not a uri"
        "#;
        assert!(matches!(
            parse_instances(source, "instances.toml"),
            Err(ConfigError::InvalidUri { .. })
        ));

        assert!(matches!(
            InstanceConfig::new(None, Some("mailto:ops@example.com"), None),
            Err(ConfigError::InvalidUri { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let source = r#"
            [[instances]]
            timeout_secs = 0
        "#;
        assert!(matches!(
            parse_instances(source, "instances.toml"),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_tag_list() {
        let mut instance = InstanceConfig::default();
        assert_eq!(instance.tag_list(), "");
        instance.tags.insert("team".to_string(), "ops".to_string());
        instance.tags.insert("env".to_string(), "prod".to_string());
        assert_eq!(instance.tag_list(), "env:prod,team:ops");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let source = r#"
            [[instances]]
            logstash_url = "http://typo:9600"
        "#;
        assert!(matches!(
            parse_instances(source, "instances.toml"),
            Err(ConfigError::Parse { .. })
        ));
    }
}
