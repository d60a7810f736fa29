pub mod error;

use error::Error;
use serde::{Deserialize, Serialize};

pub type GatherFlowResult<T> = Result<T, Error>;

/// One unit of data travelling down a job's chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    pub value: serde_json::Value,
}

impl Item {
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Numeric view of the value, or of the value at a JSON pointer.
    pub fn number_at(&self, pointer: Option<&str>) -> Option<f64> {
        let value = match pointer {
            Some(p) => self.value.pointer(p)?,
            None => &self.value,
        };
        value.as_f64()
    }
}

/// Outcome of a source run in which every item was accepted downstream.
/// Runs with failed pushes surface as [`error::Error::RunFailed`] instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub produced: usize,
}
