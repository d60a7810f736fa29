use async_trait::async_trait;
use gatherflow_utils::{GatherFlowResult, Item};

use super::Transform;
use crate::config::PluginConfig;

/// Swallow items whose value is null; everything else passes unchanged.
#[derive(Debug, Default)]
pub struct DropNulls;

impl DropNulls {
    pub fn from_config(_config: &PluginConfig, _: ()) -> GatherFlowResult<Box<dyn Transform>> {
        Ok(Box::new(Self))
    }
}

#[async_trait]
impl Transform for DropNulls {
    fn name(&self) -> &str { "drop_nulls" }

    async fn transform(&self, item: Item) -> GatherFlowResult<Vec<Item>> {
        if item.value.is_null() {
            return Ok(Vec::new());
        }
        Ok(vec![item])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn drop_nulls_removes_null_items() {
        assert!(DropNulls.transform(Item::new("a", Value::Null)).await.unwrap().is_empty());
        assert_eq!(DropNulls.transform(Item::new("b", 0)).await.unwrap(), vec![Item::new("b", 0)]);
    }
}
