//! Outbound sinks for collected Logstash metrics
//!
//! Gauges and service checks leave the process through one of:
//!
//! 1. **Structured logs** ([`LogSink`]): one `tracing` event per sample
//! 2. **Prometheus** ([`PrometheusSink`]): registry rendered in text format
//! 3. **Memory** ([`RecordingSink`]): kept for inspection, used by tests
//!
//! [`CheckReporter`] drives the checks on an interval.

#[cfg(test)]
pub(crate) mod capture;
pub mod log_sink;
pub mod metrics;
pub mod recording;
pub mod reporter;

pub use log_sink::LogSink;
pub use metrics::PrometheusSink;
pub use recording::RecordingSink;
pub use reporter::{CheckReporter, MonitoredInstance, RunSummary};
