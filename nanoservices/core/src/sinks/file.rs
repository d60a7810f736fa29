use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::Sink;
use crate::config::PluginConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSinkParams {
    path: PathBuf,
}

/// Appends every item as one JSON line to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    // serializes appends so concurrent callers never interleave lines
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn from_config(config: &PluginConfig, _: ()) -> GatherFlowResult<Box<dyn Sink>> {
        let params: FileSinkParams = config.parse_params()?;
        Ok(Box::new(Self::new(params.path)))
    }
}

#[async_trait]
impl Sink for FileSink {
    fn name(&self) -> &str { "file" }

    async fn accept(&self, item: Item) -> GatherFlowResult<()> {
        let mut line = serde_json::to_vec(&item)?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
