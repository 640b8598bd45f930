use crate::core::interfaces::Transform;
use anyhow::Context;

/// Turns a JSON document into a CommonJS module exporting its value.
pub struct JsonTransform;

impl JsonTransform {
    pub const NAME: &'static str = "json";
}

impl Transform for JsonTransform {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn transform(&self, source: &str) -> anyhow::Result<String> {
        let value: serde_json::Value =
            serde_json::from_str(source).context("invalid JSON module")?;
        Ok(format!("module.exports = {};", serde_json::to_string(&value)?))
    }
}
