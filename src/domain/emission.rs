//! Per-metric emission results, aggregated into per-stage reports.

use serde::Serialize;
use serde_json::Value;

/// What happened to a single metric path during a check run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MetricResult {
    Emitted { name: String, value: f64 },
    Missing { name: String },
    NonNumeric { name: String, kind: &'static str },
    /// A plugin section holding something other than a list
    NotAList { name: String, kind: &'static str },
}

impl MetricResult {
    pub fn name(&self) -> &str {
        match self {
            Self::Emitted { name, .. }
            | Self::Missing { name }
            | Self::NonNumeric { name, .. }
            | Self::NotAList { name, .. } => name,
        }
    }

    pub fn is_emitted(&self) -> bool {
        matches!(self, Self::Emitted { .. })
    }
}

/// Ordered results of one or more `emit_all` calls
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmissionOutcome {
    pub results: Vec<MetricResult>,
}

impl EmissionOutcome {
    pub fn push(&mut self, result: MetricResult) {
        self.results.push(result);
    }

    pub fn merge(&mut self, other: EmissionOutcome) {
        self.results.extend(other.results);
    }

    pub fn emitted_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_emitted()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.emitted_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &MetricResult> {
        self.results.iter().filter(|r| !r.is_emitted())
    }

    /// Value emitted under `name`, if any
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.results.iter().find_map(|r| match r {
            MetricResult::Emitted { name: n, value } if n == name => Some(*value),
            _ => None,
        })
    }
}

/// Result of a stats stage (pipeline or JVM)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StageOutcome {
    Completed(EmissionOutcome),
    Skipped { reason: String },
}

impl StageOutcome {
    pub fn emitted_count(&self) -> usize {
        match self {
            Self::Completed(outcome) => outcome.emitted_count(),
            Self::Skipped { .. } => 0,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn outcome(&self) -> Option<&EmissionOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::Skipped { .. } => None,
        }
    }
}

/// Numeric interpretation of a resolved value.
///
/// Numbers pass through, booleans map to 1/0 and numeric strings are parsed.
/// Anything else is reported by its JSON kind.
pub fn gauge_value(value: &Value) -> Result<f64, &'static str> {
    match value {
        Value::Number(n) => n.as_f64().ok_or("number"),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| "string"),
        Value::Null => Err("null"),
        Value::Array(_) => Err("array"),
        Value::Object(_) => Err("object"),
    }
}
