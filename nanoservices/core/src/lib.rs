//! gatherflow_core: configuration-driven data gathering jobs.
//!
//! A job is a chain of stages read from configuration: one source feeding a
//! sink, with optional filters and transforms wrapped around the sink as
//! decorators. Stages are built by type tag through the [`registry::Plugins`]
//! factories, assembled by [`builder::JobAssembler`], and scheduled on their
//! intervals by [`engine::GatherFlow`].
//!
//! Basic usage:
//!
//! ```no_run
//! use gatherflow_core::config::load_config;
//! use gatherflow_core::engine::GatherFlow;
//! use gatherflow_core::registry::Plugins;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("gatherflow.yaml")?;
//! let flow = GatherFlow::new(config, &Plugins::builtin())?;
//! flow.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod events;
pub mod filters;
pub mod pipeline;
pub mod registry;
pub mod scheduler;
pub mod sinks;
pub mod sources;
pub mod transforms;

pub mod logging;

pub mod metrics;
