use serde::Serialize;
use std::fmt;

/// Name under which connectivity results are reported
pub const SERVICE_CHECK_NAME: &str = "logstash.can_connect";

/// Health status forwarded to the service-check sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceCheckStatus {
    Ok,
    Critical,
}

impl ServiceCheckStatus {
    /// Numeric form used by gauge-style backends (1 = up).
    pub fn as_gauge(&self) -> f64 {
        match self {
            Self::Ok => 1.0,
            Self::Critical => 0.0,
        }
    }
}

impl fmt::Display for ServiceCheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Outcome of a single connectivity probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCheckResult {
    pub status: ServiceCheckStatus,
    pub message: String,
}

impl ServiceCheckResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ServiceCheckStatus::Ok,
            message: message.into(),
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            status: ServiceCheckStatus::Critical,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ServiceCheckStatus::Ok
    }
}
