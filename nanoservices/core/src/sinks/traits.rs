use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item};

/// Anything that accepts items: a terminal sink plugin or a decorator
/// wrapping the rest of a chain.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Take ownership of one item. An error is reported up the chain.
    async fn accept(&self, item: Item) -> GatherFlowResult<()>;
}
