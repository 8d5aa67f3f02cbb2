//! Periodic check runner for logstash-check
//!
//! Runs the Logstash check for every configured instance, one after the
//! other, on a fixed interval. Each run is summarized as a structured JSON
//! line on stdout. Everything logged while an instance is checked happens
//! inside a `check` span carrying its name and static tags.

use crate::application::check::{CheckReport, LogstashCheck};
use crate::config::{Config, InstanceConfig, SinkKind};
use crate::domain::ports::{GaugeSink, ServiceCheckSink};
use crate::infrastructure::logstash_client::HttpLogstashClient;
use crate::infrastructure::observability::{LogSink, PrometheusSink};
use prometheus::Registry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use tracing::{Instrument, info, info_span, warn};

/// Summary of one instance's check run, for JSON output
#[derive(Serialize)]
pub struct RunSummary {
    pub instance: String,
    pub tags: BTreeMap<String, String>,
    pub emitted: usize,
    #[serde(flatten)]
    pub report: CheckReport,
}

/// A configured instance paired with its ready-to-run check
pub struct MonitoredInstance {
    pub config: InstanceConfig,
    pub check: LogstashCheck,
}

pub struct CheckReporter {
    instances: Vec<MonitoredInstance>,
    interval: Duration,
    prometheus: Option<PrometheusSink>,
}

impl CheckReporter {
    pub fn new(
        instances: Vec<MonitoredInstance>,
        interval: Duration,
        prometheus: Option<PrometheusSink>,
    ) -> Self {
        Self {
            instances,
            interval,
            prometheus,
        }
    }

    /// Wire HTTP clients and sinks for every configured instance
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let registry = Arc::new(Registry::new());
        let mut prometheus = None;
        let mut instances = Vec::with_capacity(config.instances.len());

        for instance in &config.instances {
            let (gauges, checks): (Arc<dyn GaugeSink>, Arc<dyn ServiceCheckSink>) =
                match config.sink {
                    SinkKind::Log => {
                        let sink = Arc::new(
                            LogSink::new(instance.name.clone()).with_tags(instance.tag_list()),
                        );
                        let gauges: Arc<dyn GaugeSink> = sink.clone();
                        let checks: Arc<dyn ServiceCheckSink> = sink;
                        (gauges, checks)
                    }
                    SinkKind::Prometheus => {
                        let sink = PrometheusSink::with_registry(registry.clone(), &instance.name);
                        if prometheus.is_none() {
                            prometheus = Some(sink.clone());
                        }
                        let sink = Arc::new(sink);
                        let gauges: Arc<dyn GaugeSink> = sink.clone();
                        let checks: Arc<dyn ServiceCheckSink> = sink;
                        (gauges, checks)
                    }
                };

            let api = Arc::new(HttpLogstashClient::new(instance.timeout).with_context(|| {
                format!("Failed to build HTTP client for {}", instance.name)
            })?);
            let check = LogstashCheck::new(instance.logstash_uri.clone(), api, gauges, checks)?;
            instances.push(MonitoredInstance {
                config: instance.clone(),
                check,
            });
        }

        Ok(Self::new(instances, config.interval, prometheus))
    }

    /// Check every instance once, in configuration order
    pub async fn run_once(&self) -> Vec<RunSummary> {
        let mut summaries = Vec::with_capacity(self.instances.len());

        for instance in &self.instances {
            let span = info_span!(
                "check",
                instance = %instance.config.name,
                tags = %instance.config.tag_list()
            );
            let report = async {
                let report = instance.check.run().await;
                info!(
                    "CheckReporter: {} | {} metrics | {}ms",
                    report.service_check.status,
                    report.emitted_count(),
                    report.duration_ms
                );
                report
            }
            .instrument(span)
            .await;

            summaries.push(RunSummary {
                instance: instance.config.name.clone(),
                tags: instance.config.tags.clone(),
                emitted: report.emitted_count(),
                report,
            });
        }

        summaries
    }

    /// Run checks in a loop, outputting a summary per instance per run
    pub async fn run(self) {
        info!(
            "CheckReporter: Polling {} instance(s) every {:?}",
            self.instances.len(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            for summary in self.run_once().await {
                match serde_json::to_string(&summary) {
                    // Prefix lets log shippers filter check output
                    Ok(json) => println!("METRICS_JSON:{}", json),
                    Err(e) => warn!("Failed to serialize check summary: {}", e),
                }
            }

            if let Some(prometheus) = &self.prometheus {
                println!("{}", prometheus.render());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockLogstashApi;
    use crate::infrastructure::observability::RecordingSink;
    use crate::infrastructure::observability::capture::CapturedLogs;
    use serde_json::json;

    fn instance(api: Arc<MockLogstashApi>, sink: Arc<RecordingSink>) -> MonitoredInstance {
        let mut config = InstanceConfig::default();
        config.tags.insert("env".to_string(), "test".to_string());
        let check = LogstashCheck::new(
            config.logstash_uri.clone(),
            api,
            sink.clone(),
            sink,
        )
        .unwrap();
        MonitoredInstance { config, check }
    }

    #[tokio::test]
    async fn test_run_once_summarizes_each_instance() {
        let api = Arc::new(MockLogstashApi::new());
        api.set_json("/_node/stats/pipeline", json!({"pipeline": {"reloads": {"successes": 4}}}));
        let sink = Arc::new(RecordingSink::new());

        let reporter = CheckReporter::new(
            vec![instance(api.clone(), sink.clone()), instance(api, sink)],
            Duration::from_secs(15),
            None,
        );

        let summaries = reporter.run_once().await;

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].emitted, 1);
        assert_eq!(summaries[0].instance, "localhost:9600");
    }

    #[tokio::test]
    async fn test_summary_serialization() {
        let api = Arc::new(MockLogstashApi::new());
        let sink = Arc::new(RecordingSink::new());
        let reporter = CheckReporter::new(vec![instance(api, sink)], Duration::from_secs(15), None);

        let summaries = reporter.run_once().await;
        let json = serde_json::to_value(&summaries[0]).expect("Failed to serialize");

        assert_eq!(json["tags"]["env"], "test");
        assert_eq!(json["service_check"]["status"], "OK");
        assert_eq!(json["pipeline"]["state"], "skipped");
        assert_eq!(json["jvm"]["state"], "skipped");
    }

    #[test]
    fn test_from_config_builds_every_instance() {
        let mut config = Config::from_lookup(|key| match key {
            "CHECK_SINK" => Some("prometheus".to_string()),
            _ => None,
        })
        .unwrap();
        let mut second = InstanceConfig::default();
        second.name = "second".to_string();
        config.instances.push(second);

        let reporter = CheckReporter::from_config(&config).unwrap();

        assert_eq!(reporter.instances.len(), 2);
        assert!(reporter.prometheus.is_some());
    }

    #[tokio::test]
    async fn test_instance_log_lines_carry_tags() {
        let api = Arc::new(MockLogstashApi::new());
        api.set_json("/_node/stats/pipeline", json!({"pipeline": {"events": {"in": 7}}}));

        let mut config = InstanceConfig::default();
        config.tags.insert("env".to_string(), "test".to_string());
        let sink = Arc::new(LogSink::new(config.name.clone()).with_tags(config.tag_list()));
        let check = LogstashCheck::new(config.logstash_uri.clone(), api, sink.clone(), sink).unwrap();
        let reporter = CheckReporter::new(
            vec![MonitoredInstance { config, check }],
            Duration::from_secs(15),
            None,
        );

        let logs = CapturedLogs::new();
        let _guard = tracing::dispatcher::set_default(&logs.subscriber());
        reporter.run_once().await;

        let lines = logs.lines();
        assert!(lines.iter().any(|l| l.contains("logstash.pipeline.events.in")));
        assert!(lines.iter().any(|l| l.contains("CheckReporter:")));
        for line in &lines {
            assert!(line.contains("tags=env:test"), "{}", line);
        }
    }
}
