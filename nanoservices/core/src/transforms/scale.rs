use async_trait::async_trait;
use gatherflow_utils::error::Error;
use gatherflow_utils::{GatherFlowResult, Item};
use serde::Deserialize;
use serde_json::Value;

use super::Transform;
use crate::config::PluginConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScaleParams {
    factor: f64,
    #[serde(default)]
    pointer: Option<String>,
}

/// Multiplies a numeric value by a constant factor.
#[derive(Debug)]
pub struct Scale {
    factor: f64,
    pointer: Option<String>,
}

impl Scale {
    pub fn new(factor: f64) -> Self {
        Self { factor, pointer: None }
    }

    pub fn at(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = Some(pointer.into());
        self
    }

    pub fn from_config(config: &PluginConfig, _: ()) -> GatherFlowResult<Box<dyn Transform>> {
        let params: ScaleParams = config.parse_params()?;
        if !params.factor.is_finite() {
            return Err(Error::invalid_params("scale factor must be finite"));
        }
        Ok(Box::new(Self { factor: params.factor, pointer: params.pointer }))
    }

    fn scaled(&self, value: &Value) -> Option<Value> {
        // integers stay integers when the factor is whole and fits in i64
        if self.factor.fract() == 0.0 && self.factor.abs() < i64::MAX as f64 {
            if let Some(product) = value.as_i64().and_then(|i| i.checked_mul(self.factor as i64)) {
                return Some(Value::from(product));
            }
        }
        let scaled = value.as_f64()? * self.factor;
        serde_json::Number::from_f64(scaled).map(Value::Number)
    }
}

#[async_trait]
impl Transform for Scale {
    fn name(&self) -> &str { "scale" }

    async fn transform(&self, mut item: Item) -> GatherFlowResult<Vec<Item>> {
        let target = match self.pointer.as_deref() {
            Some(p) => item.value.pointer_mut(p),
            None => Some(&mut item.value),
        };
        let Some(target) = target else {
            return Err(Error::stage(format!("item `{}` has no value to scale", item.key)));
        };
        let Some(scaled) = self.scaled(target) else {
            return Err(Error::stage(format!("item `{}` is not numeric", item.key)));
        };
        *target = scaled;
        Ok(vec![item])
    }
}
