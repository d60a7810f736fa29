use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item};

/// Rewrites one item into zero, one or many items.
#[async_trait]
pub trait Transform: Send + Sync {
    fn name(&self) -> &str;

    /// Outputs are forwarded downstream in the order returned.
    async fn transform(&self, item: Item) -> GatherFlowResult<Vec<Item>>;
}
