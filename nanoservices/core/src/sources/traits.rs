use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, RunSummary};

/// Originates items. A source is built already bound to its downstream sink
/// and pushes everything it produces there when run.
#[async_trait]
pub trait Source: Send + Sync {
    /// Human-readable name for logging and metrics
    fn name(&self) -> &str;

    /// Produce this run's items and push them downstream.
    async fn gather(&self) -> GatherFlowResult<RunSummary>;
}
