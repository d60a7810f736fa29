use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item};

/// Decides whether an item continues down the chain. Filters never change items.
#[async_trait]
pub trait Filter: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(false)` drops the item; dropping is not a failure.
    async fn allows(&self, item: &Item) -> GatherFlowResult<bool>;
}
