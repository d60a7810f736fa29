use std::fmt;
use std::time::Duration;

use gatherflow_utils::{GatherFlowResult, RunSummary};

use super::sources::Source;

pub mod decorators;

pub use decorators::{FilterStage, TransformStage};

/// One fully assembled pipeline: a source already bound to its chain,
/// plus the period it runs at.
pub struct Job {
    name: String,
    interval: Duration,
    source: Box<dyn Source>,
}

impl Job {
    pub fn new(name: impl Into<String>, interval: Duration, source: Box<dyn Source>) -> Self {
        Self { name: name.into(), interval, source }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Trigger one run now.
    pub async fn run(&self) -> GatherFlowResult<RunSummary> {
        tracing::debug!(job = %self.name, source = self.source.name(), "job run starting");
        self.source.gather().await
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("source", &self.source.name())
            .finish()
    }
}
