//! Sink decorators. Each owns one plugin and the rest of the chain.

use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item};

use crate::filters::Filter;
use crate::sinks::Sink;
use crate::transforms::Transform;

/// Forwards an item to `next` only if the filter lets it through.
pub struct FilterStage {
    filter: Box<dyn Filter>,
    next: Box<dyn Sink>,
}

impl FilterStage {
    pub fn new(filter: Box<dyn Filter>, next: Box<dyn Sink>) -> Self {
        Self { filter, next }
    }
}

#[async_trait]
impl Sink for FilterStage {
    fn name(&self) -> &str {
        self.filter.name()
    }

    async fn accept(&self, item: Item) -> GatherFlowResult<()> {
        if self.filter.allows(&item).await? {
            self.next.accept(item).await
        } else {
            tracing::trace!(filter = self.filter.name(), key = %item.key, "item dropped");
            Ok(())
        }
    }
}

/// Runs the transform and forwards each output to `next`, stopping at the
/// first downstream failure.
pub struct TransformStage {
    transform: Box<dyn Transform>,
    next: Box<dyn Sink>,
}

impl TransformStage {
    pub fn new(transform: Box<dyn Transform>, next: Box<dyn Sink>) -> Self {
        Self { transform, next }
    }
}

#[async_trait]
impl Sink for TransformStage {
    fn name(&self) -> &str {
        self.transform.name()
    }

    async fn accept(&self, item: Item) -> GatherFlowResult<()> {
        for output in self.transform.transform(item).await? {
            self.next.accept(output).await?;
        }
        Ok(())
    }
}
