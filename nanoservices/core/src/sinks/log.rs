use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item};
use serde::Deserialize;

use super::Sink;
use crate::config::PluginConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogSinkParams {
    #[serde(default)]
    label: Option<String>,
}

/// Emits each item as an `info` event.
#[derive(Debug, Default)]
pub struct LogSink {
    label: String,
}

impl LogSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn from_config(config: &PluginConfig, _: ()) -> GatherFlowResult<Box<dyn Sink>> {
        let params: LogSinkParams = config.parse_params()?;
        Ok(Box::new(Self::new(params.label.unwrap_or_else(|| "log".to_string()))))
    }
}

#[async_trait]
impl Sink for LogSink {
    fn name(&self) -> &str { "log" }

    async fn accept(&self, item: Item) -> GatherFlowResult<()> {
        tracing::info!(sink = %self.label, key = %item.key, value = %item.value, "item");
        Ok(())
    }
}
