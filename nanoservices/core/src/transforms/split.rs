use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item};
use serde::Deserialize;
use serde_json::Value;

use super::Transform;
use crate::config::PluginConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SplitParams {
    #[serde(default)]
    pointer: Option<String>,
}

/// Explodes an array value into one item per element, keyed `key/index`.
/// Items without an array at the pointer pass through unchanged.
#[derive(Debug, Default)]
pub struct Split {
    pointer: Option<String>,
}

impl Split {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PluginConfig, _: ()) -> GatherFlowResult<Box<dyn Transform>> {
        let params: SplitParams = config.parse_params()?;
        Ok(Box::new(Self { pointer: params.pointer }))
    }
}

#[async_trait]
impl Transform for Split {
    fn name(&self) -> &str { "split" }

    async fn transform(&self, mut item: Item) -> GatherFlowResult<Vec<Item>> {
        let target = match self.pointer.as_deref() {
            Some(p) => item.value.pointer_mut(p),
            None => Some(&mut item.value),
        };
        let elements = match target {
            Some(Value::Array(elements)) => std::mem::take(elements),
            _ => return Ok(vec![item]),
        };
        Ok(elements
            .into_iter()
            .enumerate()
            .map(|(i, value)| Item::new(format!("{}/{i}", item.key), value))
            .collect())
    }
}
