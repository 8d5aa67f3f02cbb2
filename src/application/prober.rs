use crate::domain::logstash::PIPELINE_ENDPOINT;
use crate::domain::ports::{LogstashApi, ServiceCheckSink};
use crate::domain::service_check::{SERVICE_CHECK_NAME, ServiceCheckResult};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Single-request reachability check against `/_node/pipeline`
pub struct ConnectivityProber {
    api: Arc<dyn LogstashApi>,
    sink: Arc<dyn ServiceCheckSink>,
}

impl ConnectivityProber {
    pub fn new(api: Arc<dyn LogstashApi>, sink: Arc<dyn ServiceCheckSink>) -> Self {
        Self { api, sink }
    }

    /// Probe `base` and forward the result to the service-check sink.
    pub async fn probe(&self, base: &Url) -> ServiceCheckResult {
        let result = match base.join(PIPELINE_ENDPOINT) {
            Ok(url) => match self.api.ping(&url).await {
                Ok(()) => {
                    info!("ConnectivityProber: {} is reachable", url);
                    ServiceCheckResult::ok(format!("Connection to {} was successful", url))
                }
                Err(e) => {
                    warn!("ConnectivityProber: {}", e);
                    ServiceCheckResult::critical(e.to_string())
                }
            },
            Err(e) => {
                warn!("ConnectivityProber: Cannot build probe url from {}: {}", base, e);
                ServiceCheckResult::critical(e.to_string())
            }
        };

        self.sink
            .service_check(SERVICE_CHECK_NAME, result.status, &result.message);
        result
    }
}
