use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item, RunSummary};
use serde::Deserialize;

use super::{push_all, Source};
use crate::config::PluginConfig;
use crate::sinks::Sink;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticParams {
    items: Vec<serde_json::Value>,
}

/// Emits the same configured values on every run, keyed by position.
pub struct StaticSource {
    values: Vec<serde_json::Value>,
    sink: Box<dyn Sink>,
}

impl StaticSource {
    pub fn new(values: Vec<serde_json::Value>, sink: Box<dyn Sink>) -> Self {
        Self { values, sink }
    }

    pub fn from_config(config: &PluginConfig, sink: Box<dyn Sink>) -> GatherFlowResult<Box<dyn Source>> {
        let params: StaticParams = config.parse_params()?;
        Ok(Box::new(Self::new(params.items, sink)))
    }
}

#[async_trait]
impl Source for StaticSource {
    fn name(&self) -> &str { "static" }

    async fn gather(&self) -> GatherFlowResult<RunSummary> {
        let items = self
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| Item::new(i.to_string(), v.clone()))
            .collect();
        push_all(self.sink.as_ref(), items).await
    }
}
