//! Runs the jobs of a YAML config until Ctrl-C.
//!
//! `cargo run --example flow -- path/to/gatherflow.yaml`, or without an
//! argument to run a small built-in job that logs scaled readings.

use gatherflow::core::config::{load_config, parse_config};
use gatherflow::core::logging;
use gatherflow::{GatherFlow, Plugins};

const DEMO: &str = r#"
settings:
  default_interval: 5
  run_on_start: true
sources:
  readings:
    type: static
    items: [-2, 4, 8, 15]
sinks:
  console:
    type: log
    label: demo
filters:
  positive:
    type: range
    min: 0
transforms:
  halve:
    type: scale
    factor: 0.5
jobs:
  readings_to_console:
    source: readings
    sink: console
    transforms: [halve]
    filters: [positive]
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => parse_config(DEMO)?,
    };
    logging::init(config.settings.log.debugging);

    let flow = GatherFlow::new(config, &Plugins::builtin())?;
    tracing::info!(jobs = flow.jobs().len(), "press Ctrl-C to stop");
    let state = flow.run().await?;
    tracing::info!(in_flight = state.in_flight(), "stopped");
    Ok(())
}
