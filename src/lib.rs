pub use gatherflow_core as core;
pub use gatherflow_utils as utils;

// Convenience re-exports for common usage
pub use gatherflow_core::builder::JobAssembler;
pub use gatherflow_core::config::{load_config, GlobalConfig, JobConfig, PluginConfig};
pub use gatherflow_core::engine::GatherFlow;
pub use gatherflow_core::events::trigger::Trigger;
pub use gatherflow_core::filters::traits::Filter;
pub use gatherflow_core::pipeline::Job;
pub use gatherflow_core::registry::Plugins;
pub use gatherflow_core::sinks::traits::Sink;
pub use gatherflow_core::sources::traits::Source;
pub use gatherflow_core::transforms::traits::Transform;
pub use gatherflow_utils::{GatherFlowResult, Item, RunSummary};
