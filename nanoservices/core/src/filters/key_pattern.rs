use async_trait::async_trait;
use gatherflow_utils::error::Error;
use gatherflow_utils::{GatherFlowResult, Item};
use regex::Regex;
use serde::Deserialize;

use super::Filter;
use crate::config::PluginConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyPatternParams {
    pattern: String,
    #[serde(default)]
    invert: bool,
}

/// Passes items whose key matches a regular expression (or, inverted, does not).
#[derive(Debug)]
pub struct KeyPatternFilter {
    pattern: Regex,
    invert: bool,
}

impl KeyPatternFilter {
    pub fn new(pattern: Regex, invert: bool) -> Self {
        Self { pattern, invert }
    }

    pub fn from_config(config: &PluginConfig, _: ()) -> GatherFlowResult<Box<dyn Filter>> {
        let params: KeyPatternParams = config.parse_params()?;
        let pattern = Regex::new(&params.pattern)
            .map_err(|e| Error::invalid_params(format!("bad key pattern: {e}")))?;
        Ok(Box::new(Self::new(pattern, params.invert)))
    }
}

#[async_trait]
impl Filter for KeyPatternFilter {
    fn name(&self) -> &str { "key_pattern" }

    async fn allows(&self, item: &Item) -> GatherFlowResult<bool> {
        Ok(self.pattern.is_match(&item.key) != self.invert)
    }
}
