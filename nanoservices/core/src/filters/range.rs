use async_trait::async_trait;
use gatherflow_utils::error::Error;
use gatherflow_utils::{GatherFlowResult, Item};
use serde::Deserialize;

use super::Filter;
use crate::config::PluginConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RangeParams {
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    pointer: Option<String>,
}

/// Passes items whose numeric value lies within `[min, max]`.
/// Non-numeric values never pass.
#[derive(Debug, Default)]
pub struct RangeFilter {
    min: Option<f64>,
    max: Option<f64>,
    pointer: Option<String>,
}

impl RangeFilter {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max, pointer: None }
    }

    pub fn at(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = Some(pointer.into());
        self
    }

    pub fn from_config(config: &PluginConfig, _: ()) -> GatherFlowResult<Box<dyn Filter>> {
        let params: RangeParams = config.parse_params()?;
        if let (Some(min), Some(max)) = (params.min, params.max) {
            if min > max {
                return Err(Error::invalid_params(format!("range min {min} exceeds max {max}")));
            }
        }
        Ok(Box::new(Self { min: params.min, max: params.max, pointer: params.pointer }))
    }
}

#[async_trait]
impl Filter for RangeFilter {
    fn name(&self) -> &str { "range" }

    async fn allows(&self, item: &Item) -> GatherFlowResult<bool> {
        let Some(n) = item.number_at(self.pointer.as_deref()) else {
            return Ok(false);
        };
        Ok(self.min.map_or(true, |min| n >= min) && self.max.map_or(true, |max| n <= max))
    }
}
