//! Logstash monitoring API constants and the fixed metric catalog.

use crate::domain::errors::PathError;
use crate::domain::metric_path::MetricPath;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_LOGSTASH_URI: &str = "http://localhost:9600";

/// Applied to every request of a check run
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Top-level metric namespace
pub const NAMESPACE: &str = "logstash";

pub const PIPELINE_ENDPOINT: &str = "/_node/pipeline";
pub const NODE_STATS_ENDPOINT: &str = "/_node/stats";
pub const PIPELINE_STATS_ENDPOINT: &str = "/_node/stats/pipeline";
pub const JVM_STATS_ENDPOINT: &str = "/_node/stats/jvm";

pub const PIPELINE_METRICS: &[&str] = &[
    "pipeline.events.in",
    "pipeline.events.out",
    "pipeline.events.filtered",
    "pipeline.events.queue_push_duration_in_millis",
    "pipeline.events.duration_in_millis",
    "pipeline.queue.events",
    "pipeline.queue.data.free_space_in_bytes",
    "pipeline.queue.capacity.page_capacity_in_bytes",
    "pipeline.queue.capacity.max_queue_size_in_bytes",
    "pipeline.queue.capacity.max_unread_events",
    "pipeline.reloads.successes",
    "pipeline.reloads.failures",
];

pub const INPUT_PLUGIN_METRICS: &[&str] = &["events.out", "events.queue_push_duration_in_millis"];

pub const OUTPUT_PLUGIN_METRICS: &[&str] = &["events.out", "events.in", "events.duration_in_millis"];

pub const FILTER_PLUGIN_METRICS: &[&str] = &[
    "events.out",
    "events.in",
    "events.duration_in_millis",
    "matches",
];

pub const JVM_METRICS: &[&str] = &[
    "jvm.gc.collectors.old.collection_time_in_millis",
    "jvm.gc.collectors.old.collection_count",
    "jvm.gc.collectors.young.collection_time_in_millis",
    "jvm.gc.collectors.young.collection_count",
];

/// Plugin sections reported under `pipeline.plugins`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    Inputs,
    Outputs,
    Filters,
}

impl PluginKind {
    /// Fan-out order used by a check run
    pub const ALL: [PluginKind; 3] = [PluginKind::Inputs, PluginKind::Outputs, PluginKind::Filters];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inputs => "inputs",
            Self::Outputs => "outputs",
            Self::Filters => "filters",
        }
    }

    /// Document path of this plugin section
    pub fn section_path(&self) -> String {
        format!("pipeline.plugins.{}", self.as_str())
    }

    /// Namespace for a single plugin instance
    pub fn namespace(&self, plugin_name: &str) -> String {
        format!("{}.pipeline.plugins.{}.{}", NAMESPACE, self.as_str(), plugin_name)
    }

    fn metric_names(&self) -> &'static [&'static str] {
        match self {
            Self::Inputs => INPUT_PLUGIN_METRICS,
            Self::Outputs => OUTPUT_PLUGIN_METRICS,
            Self::Filters => FILTER_PLUGIN_METRICS,
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed metric path lists, built once per check instance
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    pub pipeline: Vec<MetricPath>,
    pub inputs: Vec<MetricPath>,
    pub outputs: Vec<MetricPath>,
    pub filters: Vec<MetricPath>,
    pub jvm: Vec<MetricPath>,
    pub plugin_sections: Vec<(PluginKind, MetricPath)>,
}

impl MetricCatalog {
    pub fn new() -> Result<Self, PathError> {
        let plugin_sections = PluginKind::ALL
            .iter()
            .map(|kind| MetricPath::parse(&kind.section_path()).map(|path| (*kind, path)))
            .collect::<Result<Vec<_>, PathError>>()?;

        Ok(Self {
            pipeline: MetricPath::parse_all(PIPELINE_METRICS)?,
            inputs: MetricPath::parse_all(PluginKind::Inputs.metric_names())?,
            outputs: MetricPath::parse_all(PluginKind::Outputs.metric_names())?,
            filters: MetricPath::parse_all(PluginKind::Filters.metric_names())?,
            jvm: MetricPath::parse_all(JVM_METRICS)?,
            plugin_sections,
        })
    }

    pub fn plugin_metrics(&self, kind: PluginKind) -> &[MetricPath] {
        match kind {
            PluginKind::Inputs => &self.inputs,
            PluginKind::Outputs => &self.outputs,
            PluginKind::Filters => &self.filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_parses_every_static_list() {
        let catalog = MetricCatalog::new().expect("static lists are valid");
        assert_eq!(catalog.pipeline.len(), 12);
        assert_eq!(catalog.inputs.len(), 2);
        assert_eq!(catalog.outputs.len(), 3);
        assert_eq!(catalog.filters.len(), 4);
        assert_eq!(catalog.jvm.len(), 4);
        assert_eq!(catalog.plugin_sections.len(), 3);
    }

    #[test]
    fn test_filter_list_includes_matches() {
        let catalog = MetricCatalog::new().unwrap();
        assert!(catalog
            .plugin_metrics(PluginKind::Filters)
            .iter()
            .any(|p| p.as_str() == "matches"));
    }

    #[test]
    fn test_plugin_namespace() {
        assert_eq!(
            PluginKind::Outputs.namespace("elasticsearch"),
            "logstash.pipeline.plugins.outputs.elasticsearch"
        );
        assert_eq!(PluginKind::Inputs.section_path(), "pipeline.plugins.inputs");
    }

    #[test]
    fn test_stats_endpoints_share_node_stats_prefix() {
        assert!(PIPELINE_STATS_ENDPOINT.starts_with(NODE_STATS_ENDPOINT));
        assert!(JVM_STATS_ENDPOINT.starts_with(NODE_STATS_ENDPOINT));
    }
}
