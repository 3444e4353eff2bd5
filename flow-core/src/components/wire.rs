//! Helpers for reading and writing document nodes.
//!
//! Every component writes its attributes through [`NodeWriter`], which drops
//! values left at their defaults, and reads them back through [`NodeReader`],
//! which substitutes defaults for anything absent or malformed.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{FlowError, FlowResult};

/// Builder for one document node.
#[derive(Debug, Default)]
pub struct NodeWriter {
    map: Map<String, Value>,
}

impl NodeWriter {
    /// Start a node of the given wire type.
    #[must_use]
    pub fn new(node_type: &str) -> Self {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(node_type.to_string()));
        Self { map }
    }

    /// Always write a string attribute.
    pub fn text(&mut self, key: &str, value: &str) -> &mut Self {
        self.map
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Write a string attribute unless it is absent or blank.
    pub fn opt_text(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.text(key, value);
        }
        self
    }

    /// Write a boolean attribute only when it is set.
    pub fn flag(&mut self, key: &str, value: bool) -> &mut Self {
        if value {
            self.map.insert(key.to_string(), Value::Bool(true));
        }
        self
    }

    /// Write an optional number.
    pub fn opt_number<N: Into<serde_json::Number>>(&mut self, key: &str, value: Option<N>) -> &mut Self {
        if let Some(value) = value {
            self.map.insert(key.to_string(), Value::Number(value.into()));
        }
        self
    }

    /// Write a serializable value unless it equals `default`.
    pub fn non_default<T: Serialize + PartialEq>(&mut self, key: &str, value: &T, default: &T) -> &mut Self {
        if value != default {
            if let Ok(v) = serde_json::to_value(value) {
                self.map.insert(key.to_string(), v);
            }
        }
        self
    }

    /// Write a raw JSON value.
    pub fn value(&mut self, key: &str, value: Value) -> &mut Self {
        self.map.insert(key.to_string(), value);
        self
    }

    /// Write an array unless it is empty.
    pub fn non_empty(&mut self, key: &str, values: Vec<Value>) -> &mut Self {
        if !values.is_empty() {
            self.map.insert(key.to_string(), Value::Array(values));
        }
        self
    }

    /// Finish the node.
    #[must_use]
    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}

/// Lenient reader over one document node.
#[derive(Debug, Clone, Copy)]
pub struct NodeReader<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> NodeReader<'a> {
    /// Wrap a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidDocument`] if `value` is not an object.
    pub fn new(value: &'a Value) -> FlowResult<Self> {
        value
            .as_object()
            .map(|map| Self { map })
            .ok_or_else(|| FlowError::InvalidDocument(format!("expected object node, got {value}")))
    }

    /// The node's `type` attribute.
    #[must_use]
    pub fn node_type(&self) -> &'a str {
        self.map.get("type").and_then(Value::as_str).unwrap_or_default()
    }

    /// A string attribute, empty when absent.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.opt_text(key).unwrap_or_default()
    }

    /// An optional string attribute.
    #[must_use]
    pub fn opt_text(&self, key: &str) -> Option<String> {
        self.map.get(key).and_then(Value::as_str).map(str::to_string)
    }

    /// A boolean attribute, `false` when absent.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.map.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// An optional unsigned number.
    #[must_use]
    pub fn opt_u32(&self, key: &str) -> Option<u32> {
        self.map
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }

    /// An optional float.
    #[must_use]
    pub fn opt_f64(&self, key: &str) -> Option<f64> {
        self.map.get(key).and_then(Value::as_f64)
    }

    /// A typed attribute, falling back to the type's default.
    #[must_use]
    pub fn parse_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.map.get(key) {
            None => T::default(),
            Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed `{key}` on {}: {e}", self.node_type());
                T::default()
            }),
        }
    }

    /// An array attribute, empty when absent.
    #[must_use]
    pub fn array(&self, key: &str) -> &'a [Value] {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    /// A nested object attribute.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<NodeReader<'a>> {
        self.map
            .get(key)
            .and_then(Value::as_object)
            .map(|map| NodeReader { map })
    }

    /// A raw attribute.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }
}

/// `on-click-action` navigating to `screen` with an optional payload.
#[must_use]
pub fn navigate_action(screen: &str, payload: Map<String, Value>) -> Value {
    serde_json::json!({
        "name": "navigate",
        "next": { "type": "screen", "name": screen },
        "payload": payload,
    })
}

/// Target screen of a `navigate` action node, if it is one.
#[must_use]
pub fn navigate_target(action: Option<NodeReader<'_>>) -> Option<String> {
    let action = action?;
    if action.text("name") != "navigate" {
        return None;
    }
    action.object("next").map(|next| next.text("name"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_action_round_trip() {
        let action = navigate_action("SECOND", Map::new());
        let node = NodeReader::new(&action).expect("object");
        assert_eq!(navigate_target(Some(node)).as_deref(), Some("SECOND"));

        let other = serde_json::json!({"name": "complete", "payload": {}});
        let node = NodeReader::new(&other).expect("object");
        assert_eq!(navigate_target(Some(node)), None);
    }

    #[test]
    fn test_writer_omits_defaults() {
        let mut node = NodeWriter::new("TextInput");
        node.text("label", "Name")
            .opt_text("helper-text", None)
            .opt_text("init-value", Some("  "))
            .flag("required", false)
            .opt_number::<u32>("max-chars", None)
            .non_empty("data-source", Vec::new());
        let value = node.build();
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["type"], "TextInput");
        assert_eq!(obj["label"], "Name");
    }

    #[test]
    fn test_reader_defaults() {
        let value = serde_json::json!({"type": "TextArea", "label": "Notes", "max-length": 300});
        let node = NodeReader::new(&value).expect("object");
        assert_eq!(node.node_type(), "TextArea");
        assert_eq!(node.text("label"), "Notes");
        assert_eq!(node.text("helper-text"), "");
        assert!(!node.flag("required"));
        assert_eq!(node.opt_u32("max-length"), Some(300));
        assert!(node.array("data-source").is_empty());
    }

    #[test]
    fn test_reader_rejects_non_object() {
        let value = serde_json::json!(["not", "a", "node"]);
        assert!(matches!(
            NodeReader::new(&value),
            Err(FlowError::InvalidDocument(_))
        ));
    }
}
