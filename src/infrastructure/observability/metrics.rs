//! Prometheus-backed sink for collected Logstash metrics
//!
//! Metric names are the dotted gauge names with every character outside
//! `[a-zA-Z0-9_:]` replaced by `_`, e.g. `logstash.pipeline.events.in`
//! becomes `logstash_pipeline_events_in`. Every sample carries an `instance`
//! label so several Logstash nodes can share one registry.
//!
//! Only gauges reported during the latest check run are exported: at the end
//! of a run every gauge that was not reported is unregistered, so a skipped
//! stage or a removed plugin shows up as absent series.

use crate::domain::ports::{GaugeSink, ServiceCheckSink};
use crate::domain::service_check::ServiceCheckStatus;
use prometheus::{Gauge, Opts, Registry, TextEncoder};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const CAN_CONNECT_METRIC: &str = "logstash_can_connect";

#[derive(Default)]
struct GaugeState {
    /// Keyed by the exported (sanitized) metric name
    gauges: HashMap<String, Gauge>,
    reported: HashSet<String>,
}

/// Prometheus registry holding one gauge per emitted metric
#[derive(Clone)]
pub struct PrometheusSink {
    registry: Arc<Registry>,
    instance: String,
    state: Arc<Mutex<GaugeState>>,
    /// Service check status (1=OK, 0=CRITICAL), registered on the first check
    can_connect: Arc<Mutex<Option<Gauge>>>,
}

impl PrometheusSink {
    /// Sink with its own registry
    pub fn new(instance: &str) -> Self {
        Self::with_registry(Arc::new(Registry::new()), instance)
    }

    /// Sink registering into a registry shared with other instances
    pub fn with_registry(registry: Arc<Registry>, instance: &str) -> Self {
        Self {
            registry,
            instance: instance.to_string(),
            state: Arc::new(Mutex::new(GaugeState::default())),
            can_connect: Arc::new(Mutex::new(None)),
        }
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    fn register(&self, metric: &str, help: &str) -> prometheus::Result<Gauge> {
        let opts = Opts::new(metric, help).const_label("instance", self.instance.as_str());
        let gauge = Gauge::with_opts(opts)?;
        self.registry.register(Box::new(gauge.clone()))?;
        Ok(gauge)
    }
}

impl GaugeSink for PrometheusSink {
    fn gauge(&self, name: &str, value: f64) {
        let metric = sanitize(name);
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        let existing = state.gauges.get(&metric).cloned();
        let gauge = match existing {
            Some(gauge) => gauge,
            None => {
                // Help text must only depend on the exported name: instances
                // sharing a registry register the same family.
                match self.register(&metric, &format!("Logstash gauge {}", metric)) {
                    Ok(gauge) => {
                        state.gauges.insert(metric.clone(), gauge.clone());
                        gauge
                    }
                    Err(e) => {
                        warn!("PrometheusSink: Cannot register gauge {}: {}", metric, e);
                        return;
                    }
                }
            }
        };

        gauge.set(value);
        state.reported.insert(metric);
    }

    fn end_run(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let GaugeState { gauges, reported } = &mut *state;

        gauges.retain(|metric, gauge| {
            if reported.contains(metric) {
                return true;
            }
            debug!("PrometheusSink: Dropping stale gauge {}", metric);
            if let Err(e) = self.registry.unregister(Box::new(gauge.clone())) {
                warn!("PrometheusSink: Cannot unregister gauge {}: {}", metric, e);
            }
            false
        });
        reported.clear();
    }
}

impl ServiceCheckSink for PrometheusSink {
    fn service_check(&self, _name: &str, status: ServiceCheckStatus, _message: &str) {
        let Ok(mut can_connect) = self.can_connect.lock() else {
            return;
        };

        if can_connect.is_none() {
            match self.register(
                CAN_CONNECT_METRIC,
                "Logstash connectivity service check (1=OK, 0=CRITICAL)",
            ) {
                Ok(gauge) => *can_connect = Some(gauge),
                Err(e) => {
                    warn!("PrometheusSink: Cannot register {}: {}", CAN_CONNECT_METRIC, e);
                    return;
                }
            }
        }

        if let Some(gauge) = can_connect.as_ref() {
            gauge.set(status.as_gauge());
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
