use thiserror::Error;

/// Errors raised while building a metric path from configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Metric path is empty")]
    Empty,

    #[error("Metric path '{path}' contains an empty segment")]
    EmptySegment { path: String },
}

/// Errors related to fetching data from the Logstash monitoring API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("HTTP status {status} for url ({url})")]
    Status { url: String, status: u16 },

    #[error("Malformed JSON from {url}: {reason}")]
    MalformedJson { url: String, reason: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::MalformedJson { url, .. } => url,
        }
    }
}

/// Errors related to loading check configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid logstash_uri '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("Invalid sink '{0}'. Must be 'log' or 'prometheus'")]
    InvalidSink(String),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
