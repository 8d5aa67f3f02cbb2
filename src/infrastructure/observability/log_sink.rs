use crate::domain::ports::{GaugeSink, ServiceCheckSink};
use crate::domain::service_check::ServiceCheckStatus;
use tracing::{info, warn};

/// Writes every gauge and service check as a structured log event.
///
/// Events carry `metric`/`value` (or `check`/`status`) fields so JSON log
/// shippers can pick them up without parsing the message, plus the
/// instance's static `tags`.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    instance: String,
    tags: String,
}

impl LogSink {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            tags: String::new(),
        }
    }

    /// Attach `key:value,...` tags to every event
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }
}

impl GaugeSink for LogSink {
    fn gauge(&self, name: &str, value: f64) {
        info!(
            target: "logstash_check::gauge",
            instance = %self.instance,
            tags = %self.tags,
            metric = name,
            value,
            "gauge"
        );
    }
}

impl ServiceCheckSink for LogSink {
    fn service_check(&self, name: &str, status: ServiceCheckStatus, message: &str) {
        match status {
            ServiceCheckStatus::Ok => info!(
                target: "logstash_check::service_check",
                instance = %self.instance,
            tags = %self.tags,
                check = name,
                status = %status,
                "{}",
                message
            ),
            ServiceCheckStatus::Critical => warn!(
                target: "logstash_check::service_check",
                instance = %self.instance,
            tags = %self.tags,
                check = name,
                status = %status,
                "{}",
                message
            ),
        }
    }
}
