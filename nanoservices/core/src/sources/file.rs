use async_trait::async_trait;
use gatherflow_utils::error::Error;
use gatherflow_utils::{GatherFlowResult, Item, RunSummary};
use serde::Deserialize;
use std::path::PathBuf;

use super::{push_all, Source};
use crate::config::PluginConfig;
use crate::sinks::Sink;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSourceParams {
    path: PathBuf,
}

/// Reads a JSON-lines file on every run; one item per non-empty line,
/// keyed `path:line`.
pub struct FileSource {
    path: PathBuf,
    sink: Box<dyn Sink>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, sink: Box<dyn Sink>) -> Self {
        Self { path: path.into(), sink }
    }

    pub fn from_config(config: &PluginConfig, sink: Box<dyn Sink>) -> GatherFlowResult<Box<dyn Source>> {
        let params: FileSourceParams = config.parse_params()?;
        Ok(Box::new(Self::new(params.path, sink)))
    }

    async fn read_items(&self) -> GatherFlowResult<Vec<Item>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let display = self.path.display();
        let mut items = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let value: serde_json::Value = serde_json::from_str(line)
                .map_err(|e| Error::stage(format!("{display}:{}: {e}", n + 1)))?;
            items.push(Item::new(format!("{display}:{}", n + 1), value));
        }
        Ok(items)
    }
}

#[async_trait]
impl Source for FileSource {
    fn name(&self) -> &str { "file" }

    async fn gather(&self) -> GatherFlowResult<RunSummary> {
        let items = self.read_items().await?;
        push_all(self.sink.as_ref(), items).await
    }
}
