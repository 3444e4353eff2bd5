//! Free-text inputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{default_field_name, form_field, Component, Construct, NodeReader, NodeWriter, Preview, WireContext};
use crate::validation::{Rules, MAX_HELPER_TEXT_LEN, MAX_INPUT_LABEL_LEN, MAX_TEXT_AREA_LENGTH};
use crate::{ElementId, ElementTag};

/// Keyboard and masking of a text input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Free text.
    #[default]
    Text,
    /// Numeric keyboard.
    Number,
    /// Email address.
    Email,
    /// Masked text.
    Password,
    /// Masked numeric code.
    Passcode,
    /// Phone number.
    Phone,
}

fn label_summary(label: &str, required: bool) -> String {
    if required {
        format!("{label} *")
    } else {
        label.to_string()
    }
}

fn char_count(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v.chars().count()).ok())
}

/// Single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextInput {
    /// Submitted field name.
    pub name: String,
    /// Label above the input.
    pub label: String,
    /// Keyboard type.
    pub input_type: InputType,
    /// Must be filled before submitting.
    pub required: bool,
    /// Hint under the input.
    pub helper_text: Option<String>,
    /// Minimum characters.
    pub min_chars: Option<u32>,
    /// Maximum characters.
    pub max_chars: Option<u32>,
    /// Prefilled value.
    pub init_value: Option<String>,
}

impl Component for TextInput {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.field_name(&self.name);
        rules.text("label", &self.label, MAX_INPUT_LABEL_LEN, "Label is required");
        rules.opt_length("helper-text", self.helper_text.as_deref(), MAX_HELPER_TEXT_LEN);
        rules.bounds("min-chars", "max-chars", self.min_chars, self.max_chars);
        if let Some(max) = self.max_chars {
            rules.at_most(
                "init-value",
                char_count(self.init_value.as_deref()),
                max as usize,
                "max-chars",
            );
        }
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let mut node = NodeWriter::new("TextInput");
        node.text("name", &self.name)
            .text("label", &self.label)
            .non_default("input-type", &self.input_type, &InputType::Text)
            .flag("required", self.required)
            .opt_text("helper-text", self.helper_text.as_deref())
            .opt_number("min-chars", self.min_chars)
            .opt_number("max-chars", self.max_chars)
            .opt_text("init-value", self.init_value.as_deref());
        node.build()
    }

    fn render(&self) -> Preview {
        Preview::new("Text input", label_summary(&self.label, self.required))
    }

    form_field!();
}

impl Construct for TextInput {
    fn seeded(id: &ElementId) -> Self {
        Self {
            name: default_field_name(ElementTag::TextInput, id),
            label: "Text input".to_string(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        Self {
            name: node.text("name"),
            label: node.text("label"),
            input_type: node.parse_or_default("input-type"),
            required: node.flag("required"),
            helper_text: node.opt_text("helper-text"),
            min_chars: node.opt_u32("min-chars"),
            max_chars: node.opt_u32("max-chars"),
            init_value: node.opt_text("init-value"),
        }
    }
}

/// Multi-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextArea {
    /// Submitted field name.
    pub name: String,
    /// Label above the input.
    pub label: String,
    /// Must be filled before submitting.
    pub required: bool,
    /// Hint under the input.
    pub helper_text: Option<String>,
    /// Maximum characters.
    pub max_length: Option<u32>,
    /// Prefilled value.
    pub init_value: Option<String>,
}

impl Component for TextArea {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.field_name(&self.name);
        rules.text("label", &self.label, MAX_INPUT_LABEL_LEN, "Label is required");
        rules.opt_length("helper-text", self.helper_text.as_deref(), MAX_HELPER_TEXT_LEN);
        rules.at_most("max-length", self.max_length, MAX_TEXT_AREA_LENGTH, "the text area limit");
        if let Some(max) = self.max_length {
            rules.at_most(
                "init-value",
                char_count(self.init_value.as_deref()),
                max as usize,
                "max-length",
            );
        }
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let mut node = NodeWriter::new("TextArea");
        node.text("name", &self.name)
            .text("label", &self.label)
            .flag("required", self.required)
            .opt_text("helper-text", self.helper_text.as_deref())
            .opt_number("max-length", self.max_length)
            .opt_text("init-value", self.init_value.as_deref());
        node.build()
    }

    fn render(&self) -> Preview {
        Preview::new("Text area", label_summary(&self.label, self.required))
    }

    form_field!();
}

impl Construct for TextArea {
    fn seeded(id: &ElementId) -> Self {
        Self {
            name: default_field_name(ElementTag::TextArea, id),
            label: "Text area".to_string(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        Self {
            name: node.text("name"),
            label: node.text("label"),
            required: node.flag("required"),
            helper_text: node.opt_text("helper-text"),
            max_length: node.opt_u32("max-length"),
            init_value: node.opt_text("init-value"),
        }
    }
}
