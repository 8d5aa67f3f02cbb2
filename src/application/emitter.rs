use crate::domain::emission::{EmissionOutcome, MetricResult, gauge_value};
use crate::domain::logstash::{MetricCatalog, NAMESPACE, PluginKind};
use crate::domain::metric_path::{MetricPath, Resolution};
use crate::domain::ports::GaugeSink;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Resolves metric paths in a stats document and forwards found values as gauges.
///
/// Each path is handled independently: a missing or non-numeric field is
/// logged and recorded, and the remaining paths are still emitted.
#[derive(Clone)]
pub struct MetricEmitter {
    sink: Arc<dyn GaugeSink>,
}

impl MetricEmitter {
    pub fn new(sink: Arc<dyn GaugeSink>) -> Self {
        Self { sink }
    }

    /// Emit every path in `paths` found in `doc` as `namespace.path`.
    pub fn emit_all(&self, namespace: &str, paths: &[MetricPath], doc: &Value) -> EmissionOutcome {
        let mut outcome = EmissionOutcome::default();

        for path in paths {
            let name = path.qualified(namespace);
            match path.resolve(doc) {
                Resolution::Found(value) => match gauge_value(value) {
                    Ok(v) => {
                        debug!("MetricEmitter: {} = {}", name, v);
                        self.sink.gauge(&name, v);
                        outcome.push(MetricResult::Emitted { name, value: v });
                    }
                    Err(kind) => {
                        warn!(
                            "MetricEmitter: Metric {} in namespace {} is not numeric ({})",
                            path, namespace, kind
                        );
                        outcome.push(MetricResult::NonNumeric { name, kind });
                    }
                },
                Resolution::NotFound => {
                    error!("MetricEmitter: Cannot find metric {} in namespace {}", path, namespace);
                    outcome.push(MetricResult::Missing { name });
                }
            }
        }

        outcome
    }

    /// Fan out over the `pipeline.plugins.{inputs,outputs,filters}` sections.
    ///
    /// Every plugin instance is emitted under its own namespace,
    /// `logstash.pipeline.plugins.<kind>.<name>`.
    pub fn emit_plugins(&self, catalog: &MetricCatalog, doc: &Value) -> EmissionOutcome {
        let mut outcome = EmissionOutcome::default();

        for (kind, section_path) in &catalog.plugin_sections {
            let section_name = section_path.qualified(NAMESPACE);

            let plugins = match section_path.resolve(doc) {
                Resolution::Found(Value::Array(plugins)) => plugins,
                Resolution::Found(other) => {
                    error!(
                        "MetricEmitter: Plugin section {} is not a list (got {})",
                        section_path,
                        json_kind(other)
                    );
                    outcome.push(MetricResult::NotAList {
                        name: section_name,
                        kind: json_kind(other),
                    });
                    continue;
                }
                Resolution::NotFound => {
                    error!("MetricEmitter: Cannot find plugin section {}", section_path);
                    outcome.push(MetricResult::Missing { name: section_name });
                    continue;
                }
            };

            for (index, plugin) in plugins.iter().enumerate() {
                outcome.merge(self.emit_plugin(catalog, *kind, index, plugin));
            }
        }

        outcome
    }

    fn emit_plugin(
        &self,
        catalog: &MetricCatalog,
        kind: PluginKind,
        index: usize,
        plugin: &Value,
    ) -> EmissionOutcome {
        match plugin.get("name").and_then(Value::as_str) {
            Some(name) => self.emit_all(&kind.namespace(name), catalog.plugin_metrics(kind), plugin),
            None => {
                error!(
                    "MetricEmitter: Plugin #{} in section {} has no name, skipping",
                    index, kind
                );
                let mut outcome = EmissionOutcome::default();
                outcome.push(MetricResult::Missing {
                    name: format!("{}.pipeline.plugins.{}[{}].name", NAMESPACE, kind, index),
                });
                outcome
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
