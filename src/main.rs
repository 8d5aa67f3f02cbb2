//! logstash-check - Logstash monitoring API collector
//!
//! Polls each configured Logstash node, emits pipeline, plugin and JVM gauges
//! plus the `logstash.can_connect` service check.
//!
//! # Usage
//! ```sh
//! LOGSTASH_URI=http://localhost:9600 logstash-check
//! logstash-check --config instances.toml --sink prometheus --interval 30
//! logstash-check --once
//! ```
//!
//! # Environment Variables
//! - `LOGSTASH_URI` - Base address of the node (default: http://localhost:9600)
//! - `CHECK_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `CHECK_INTERVAL_SECS` - Seconds between runs (default: 15)
//! - `CHECK_SINK` - `log` or `prometheus` (default: log)
//! - `LOG_FORMAT` - `json` for JSON log lines

use anyhow::{Context, Result};
use clap::Parser;
use logstash_check::config::{Config, LogFormat, SinkKind};
use logstash_check::infrastructure::observability::CheckReporter;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Logstash monitoring API collector", long_about = None)]
struct Cli {
    /// TOML file listing the instances to poll
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run every check once, print the reports as JSON and exit
    #[arg(long)]
    once: bool,

    /// Seconds between check runs (overrides CHECK_INTERVAL_SECS)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Metric sink: log or prometheus (overrides CHECK_SINK)
    #[arg(long)]
    sink: Option<SinkKind>,
}

fn init_logging(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = &cli.config {
        config = config.with_instances_file(path)?;
    }
    if let Some(secs) = cli.interval {
        anyhow::ensure!(secs > 0, "--interval must be greater than zero");
        config.interval = Duration::from_secs(secs);
    }
    if let Some(sink) = cli.sink {
        config.sink = sink;
    }

    init_logging(config.log_format);

    info!("logstash-check {} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: Instances={:?}, Sink={:?}, Interval={:?}",
        config
            .instances
            .iter()
            .map(|i| i.logstash_uri.as_str())
            .collect::<Vec<_>>(),
        config.sink,
        config.interval
    );

    let reporter = CheckReporter::from_config(&config).context("Failed to build checks")?;

    if cli.once {
        let summaries = reporter.run_once().await;
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    tokio::select! {
        _ = reporter.run() => {}
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("Shutdown signal received. Exiting...");
        }
    }

    Ok(())
}
