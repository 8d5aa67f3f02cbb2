//! One poll of a Logstash instance.
//!
//! A run is three sequential stages, each contained on its own:
//! 1. connectivity probe against `/_node/pipeline`
//! 2. `/_node/stats/pipeline`: pipeline metrics, then per-plugin fan-out
//! 3. `/_node/stats/jvm`: garbage collector metrics
//!
//! A failed fetch skips that stage's metrics only. `run` never fails.

use crate::application::emitter::MetricEmitter;
use crate::application::prober::ConnectivityProber;
use crate::domain::emission::StageOutcome;
use crate::domain::errors::PathError;
use crate::domain::logstash::{JVM_STATS_ENDPOINT, MetricCatalog, NAMESPACE, PIPELINE_STATS_ENDPOINT};
use crate::domain::ports::{GaugeSink, LogstashApi, ServiceCheckSink};
use crate::domain::service_check::ServiceCheckResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};
use url::Url;

/// Everything a check run produced
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub uri: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub service_check: ServiceCheckResult,
    pub pipeline: StageOutcome,
    pub jvm: StageOutcome,
}

impl CheckReport {
    pub fn emitted_count(&self) -> usize {
        self.pipeline.emitted_count() + self.jvm.emitted_count()
    }
}

pub struct LogstashCheck {
    base: Url,
    api: Arc<dyn LogstashApi>,
    gauges: Arc<dyn GaugeSink>,
    prober: ConnectivityProber,
    emitter: MetricEmitter,
    catalog: MetricCatalog,
}

impl LogstashCheck {
    pub fn new(
        base: Url,
        api: Arc<dyn LogstashApi>,
        gauges: Arc<dyn GaugeSink>,
        checks: Arc<dyn ServiceCheckSink>,
    ) -> Result<Self, PathError> {
        Ok(Self {
            base,
            prober: ConnectivityProber::new(api.clone(), checks),
            emitter: MetricEmitter::new(gauges.clone()),
            api,
            gauges,
            catalog: MetricCatalog::new()?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Run the probe and both stats stages in order.
    pub async fn run(&self) -> CheckReport {
        let started_at = Utc::now();
        let timer = Instant::now();

        let service_check = self.prober.probe(&self.base).await;

        debug!("LogstashCheck: Collecting pipeline metrics");
        let pipeline = self.collect_pipeline_metrics().await;

        debug!("LogstashCheck: Collecting jvm metrics");
        let jvm = self.collect_jvm_metrics().await;

        self.gauges.end_run();

        CheckReport {
            uri: self.base.to_string(),
            started_at,
            duration_ms: timer.elapsed().as_millis() as u64,
            service_check,
            pipeline,
            jvm,
        }
    }

    async fn collect_pipeline_metrics(&self) -> StageOutcome {
        let doc = match self.fetch_stats(PIPELINE_STATS_ENDPOINT).await {
            Ok(doc) => doc,
            Err(reason) => return StageOutcome::Skipped { reason },
        };

        let mut outcome = self
            .emitter
            .emit_all(NAMESPACE, &self.catalog.pipeline, &doc);
        outcome.merge(self.emitter.emit_plugins(&self.catalog, &doc));

        info!(
            "LogstashCheck: Pipeline stage emitted {} metrics ({} failed)",
            outcome.emitted_count(),
            outcome.failed_count()
        );
        StageOutcome::Completed(outcome)
    }

    async fn collect_jvm_metrics(&self) -> StageOutcome {
        let doc = match self.fetch_stats(JVM_STATS_ENDPOINT).await {
            Ok(doc) => doc,
            Err(reason) => return StageOutcome::Skipped { reason },
        };

        let outcome = self.emitter.emit_all(NAMESPACE, &self.catalog.jvm, &doc);

        info!(
            "LogstashCheck: JVM stage emitted {} metrics ({} failed)",
            outcome.emitted_count(),
            outcome.failed_count()
        );
        StageOutcome::Completed(outcome)
    }

    /// Fetch a stats document, turning every failure into a logged skip reason.
    async fn fetch_stats(&self, endpoint: &str) -> Result<Value, String> {
        let url = self.base.join(endpoint).map_err(|e| {
            error!("LogstashCheck: Cannot build url for {}: {}", endpoint, e);
            e.to_string()
        })?;

        self.api.fetch_json(&url).await.map_err(|e| {
            error!(
                "LogstashCheck: Failed to fetch {}. Skipped sending metrics. {}",
                url, e
            );
            e.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FetchError;
    use crate::infrastructure::mock::MockLogstashApi;
    use crate::infrastructure::observability::{PrometheusSink, RecordingSink};
    use serde_json::json;

    fn build(api: Arc<MockLogstashApi>, sink: Arc<RecordingSink>) -> LogstashCheck {
        LogstashCheck::new(
            Url::parse("http://localhost:9600").unwrap(),
            api,
            sink.clone(),
            sink,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_jvm_metrics_use_logstash_namespace() {
        let api = Arc::new(MockLogstashApi::new());
        api.set_json(
            "/_node/stats/jvm",
            json!({"jvm": {"gc": {"collectors": {
                "old": {"collection_time_in_millis": 100, "collection_count": 2},
                "young": {"collection_time_in_millis": 50, "collection_count": 9}
            }}}}),
        );
        let sink = Arc::new(RecordingSink::new());

        let report = build(api, sink.clone()).run().await;

        assert_eq!(report.jvm.emitted_count(), 4);
        assert_eq!(
            sink.gauge_value("logstash.jvm.gc.collectors.young.collection_count"),
            Some(9.0)
        );
        // Pipeline document was never configured on the mock
        assert!(report.pipeline.is_skipped());
    }

    #[tokio::test]
    async fn test_failed_probe_does_not_stop_stats_stages() {
        let api = Arc::new(MockLogstashApi::new());
        api.fail_path(
            "/_node/pipeline",
            FetchError::Transport {
                url: "http://localhost:9600/_node/pipeline".to_string(),
                reason: "connection refused".to_string(),
            },
        );
        api.set_json(
            "/_node/stats/pipeline",
            json!({"pipeline": {"events": {"in": 1}}}),
        );
        let sink = Arc::new(RecordingSink::new());

        let report = build(api.clone(), sink.clone()).run().await;

        assert!(!report.service_check.is_ok());
        assert_eq!(sink.gauge_value("logstash.pipeline.events.in"), Some(1.0));
        assert_eq!(
            api.requested_paths(),
            vec!["/_node/pipeline", "/_node/stats/pipeline", "/_node/stats/jvm"]
        );
    }

    #[tokio::test]
    async fn test_skipped_stage_removes_previous_gauges_from_prometheus() {
        let api = Arc::new(MockLogstashApi::new());
        api.set_json(
            "/_node/stats/jvm",
            json!({"jvm": {"gc": {"collectors": {"old": {"collection_count": 3}}}}}),
        );
        let sink = Arc::new(PrometheusSink::new("t"));
        let check = LogstashCheck::new(
            Url::parse("http://localhost:9600").unwrap(),
            api.clone(),
            sink.clone(),
            sink.clone(),
        )
        .unwrap();

        check.run().await;
        assert!(sink
            .render()
            .contains(r#"logstash_jvm_gc_collectors_old_collection_count{instance="t"} 3"#));

        api.fail_path(
            "/_node/stats/jvm",
            FetchError::Timeout {
                url: "http://localhost:9600/_node/stats/jvm".to_string(),
            },
        );
        let report = check.run().await;

        assert!(report.jvm.is_skipped());
        let output = sink.render();
        assert!(!output.contains("logstash_jvm_gc_collectors_old_collection_count"));
        assert!(output.contains(r#"logstash_can_connect{instance="t"} 1"#));
    }
}
