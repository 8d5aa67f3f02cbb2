use crate::domain::errors::FetchError;
use crate::domain::service_check::ServiceCheckStatus;
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

// Need async_trait for async functions in traits
#[async_trait]
pub trait LogstashApi: Send + Sync {
    /// GET `url` and succeed only on a 2xx status.
    async fn ping(&self, url: &Url) -> Result<(), FetchError>;

    /// GET `url` and parse the body as JSON.
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError>;
}

/// Receives point-in-time numeric samples
pub trait GaugeSink: Send + Sync {
    fn gauge(&self, name: &str, value: f64);

    /// Called once a check run is over. Stateful sinks drop every gauge not
    /// reported since the previous call.
    fn end_run(&self) {}
}

/// Receives health signals
pub trait ServiceCheckSink: Send + Sync {
    fn service_check(&self, name: &str, status: ServiceCheckStatus, message: &str);
}
