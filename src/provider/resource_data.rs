//! Per-call state of a data source or resource instance

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Identifier plus attribute values
///
/// An empty identifier means the remote object is not known to exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceData {
    id: String,
    attributes: Map<String, Value>,
}

impl ResourceData {
    /// Start from a configuration object
    pub fn from_config(config: Value) -> Result<Self> {
        let attributes = match config {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => bail!("Configuration must be a JSON object, got {}", other),
        };

        let id = attributes
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self { id, attributes })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// String attribute; missing or non-string values read as ""
    pub fn get_str(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Attributes as persisted, with `id` reflecting the identifier
    pub fn state(&self) -> Map<String, Value> {
        let mut state = self.attributes.clone();
        state.insert("id".to_string(), Value::String(self.id.clone()));
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_config_reads_id_and_attributes() {
        let data = ResourceData::from_config(json!({"id": "U1/S1", "user_id": "U1"})).unwrap();
        assert_eq!(data.id(), "U1/S1");
        assert_eq!(data.get_str("user_id"), "U1");
        assert_eq!(data.get_str("missing"), "");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ResourceData::from_config(json!([1, 2])).is_err());
        assert_eq!(ResourceData::from_config(Value::Null).unwrap(), ResourceData::default());
    }

    #[test]
    fn test_state_mirrors_identifier() {
        let mut data = ResourceData::from_config(json!({"id": "old", "name": "aws"})).unwrap();
        data.set_id("");
        data.set("ssourl", "https://x");

        let state = data.state();
        assert_eq!(state["id"], "");
        assert_eq!(state["ssourl"], "https://x");
        assert_eq!(state["name"], "aws");
    }
}
