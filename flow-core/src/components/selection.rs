//! Option selectors and the opt-in checkbox.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::options::{default_options, read_options, write_options, SelectOption};
use super::wire::{navigate_action, navigate_target};
use super::{default_field_name, form_field, Component, Construct, NodeReader, NodeWriter, Preview, WireContext};
use crate::validation::{
    Rules, CHIPS_OPTION_RANGE, DROPDOWN_OPTION_RANGE, MAX_CHIPS_LABEL_LEN, MAX_DESCRIPTION_LEN,
    MAX_INPUT_LABEL_LEN, MAX_OPT_IN_LABEL_LEN, MAX_SELECTOR_LABEL_LEN, OPTION_RANGE,
};
use crate::{ElementId, ElementTag};

/// Options seeded into a new selector.
const SEEDED_OPTIONS: usize = 3;

fn options_summary(label: &str, options: &[SelectOption]) -> String {
    format!("{label} ({} options)", options.len())
}

/// Selectors where the user may pick several options.
macro_rules! multi_selector {
    ($(#[$doc:meta])* $name:ident, $preview:literal, $label_limit:ident, $range:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Submitted field name.
            pub name: String,
            /// Label above the options.
            pub label: String,
            /// Text under the label.
            pub description: Option<String>,
            /// Choices in display order.
            pub options: Vec<SelectOption>,
            /// Must be answered before submitting.
            pub required: bool,
            /// Fewest options that may be picked.
            pub min_selected_items: Option<u32>,
            /// Most options that may be picked.
            pub max_selected_items: Option<u32>,
        }

        impl Component for $name {
            fn validate(&self, rules: &mut Rules<'_>) {
                rules.field_name(&self.name);
                rules.text("label", &self.label, $label_limit, "Label is required");
                rules.opt_length("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
                rules.options(&self.options, &$range);
                rules.bounds(
                    "min-selected-items",
                    "max-selected-items",
                    self.min_selected_items,
                    self.max_selected_items,
                );
                let count = self.options.len();
                rules.at_most("min-selected-items", self.min_selected_items, count, "the option count");
                rules.at_most("max-selected-items", self.max_selected_items, count, "the option count");
            }

            fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
                let mut node = NodeWriter::new(stringify!($name));
                node.text("name", &self.name)
                    .text("label", &self.label)
                    .opt_text("description", self.description.as_deref())
                    .value("data-source", Value::Array(write_options(&self.options)))
                    .flag("required", self.required)
                    .opt_number("min-selected-items", self.min_selected_items)
                    .opt_number("max-selected-items", self.max_selected_items);
                node.build()
            }

            fn render(&self) -> Preview {
                Preview::new($preview, options_summary(&self.label, &self.options))
            }

            form_field!();
        }

        impl Construct for $name {
            fn seeded(id: &ElementId) -> Self {
                Self {
                    name: default_field_name(ElementTag::$name, id),
                    label: $preview.to_string(),
                    options: default_options(SEEDED_OPTIONS),
                    ..Self::default()
                }
            }

            fn from_node(node: NodeReader<'_>) -> Self {
                Self {
                    name: node.text("name"),
                    label: node.text("label"),
                    description: node.opt_text("description"),
                    options: read_options(node.array("data-source")),
                    required: node.flag("required"),
                    min_selected_items: node.opt_u32("min-selected-items"),
                    max_selected_items: node.opt_u32("max-selected-items"),
                }
            }
        }
    };
}

/// Selectors where the user picks exactly one option.
macro_rules! single_selector {
    ($(#[$doc:meta])* $name:ident, $preview:literal, $label_limit:ident, $range:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Submitted field name.
            pub name: String,
            /// Label above the options.
            pub label: String,
            /// Text under the label.
            pub description: Option<String>,
            /// Choices in display order.
            pub options: Vec<SelectOption>,
            /// Must be answered before submitting.
            pub required: bool,
        }

        impl Component for $name {
            fn validate(&self, rules: &mut Rules<'_>) {
                rules.field_name(&self.name);
                rules.text("label", &self.label, $label_limit, "Label is required");
                rules.opt_length("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
                rules.options(&self.options, &$range);
            }

            fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
                let mut node = NodeWriter::new(stringify!($name));
                node.text("name", &self.name)
                    .text("label", &self.label)
                    .opt_text("description", self.description.as_deref())
                    .value("data-source", Value::Array(write_options(&self.options)))
                    .flag("required", self.required);
                node.build()
            }

            fn render(&self) -> Preview {
                Preview::new($preview, options_summary(&self.label, &self.options))
            }

            form_field!();
        }

        impl Construct for $name {
            fn seeded(id: &ElementId) -> Self {
                Self {
                    name: default_field_name(ElementTag::$name, id),
                    label: $preview.to_string(),
                    options: default_options(SEEDED_OPTIONS),
                    ..Self::default()
                }
            }

            fn from_node(node: NodeReader<'_>) -> Self {
                Self {
                    name: node.text("name"),
                    label: node.text("label"),
                    description: node.opt_text("description"),
                    options: read_options(node.array("data-source")),
                    required: node.flag("required"),
                }
            }
        }
    };
}

multi_selector!(
    /// Multiple choice with checkboxes.
    CheckboxGroup, "Checkbox group", MAX_SELECTOR_LABEL_LEN, OPTION_RANGE
);
multi_selector!(
    /// Multiple choice with chips.
    ChipsSelector, "Chips selector", MAX_CHIPS_LABEL_LEN, CHIPS_OPTION_RANGE
);
single_selector!(
    /// Single choice with radio buttons.
    RadioButtonsGroup, "Radio buttons", MAX_SELECTOR_LABEL_LEN, OPTION_RANGE
);
single_selector!(
    /// Single choice from a dropdown.
    Dropdown, "Dropdown", MAX_INPUT_LABEL_LEN, DROPDOWN_OPTION_RANGE
);

/// Consent checkbox, optionally linking to a screen with the full terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptIn {
    /// Submitted field name.
    pub name: String,
    /// Consent text.
    pub label: String,
    /// Must be ticked before submitting.
    pub required: bool,
    /// Screen opened by the "Read more" link.
    pub read_more_screen: Option<String>,
}

impl Component for OptIn {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.field_name(&self.name);
        rules.text("label", &self.label, MAX_OPT_IN_LABEL_LEN, "Label is required");
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let mut node = NodeWriter::new("OptIn");
        node.text("name", &self.name)
            .text("label", &self.label)
            .flag("required", self.required);
        if let Some(screen) = self.read_more_screen.as_deref().filter(|s| !s.is_empty()) {
            node.value("on-click-action", navigate_action(screen, Map::new()));
        }
        node.build()
    }

    fn render(&self) -> Preview {
        Preview::new("Opt-in", self.label.clone())
    }

    fn navigation_targets(&self) -> Vec<&str> {
        self.read_more_screen
            .as_deref()
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect()
    }

    form_field!();
}

impl Construct for OptIn {
    fn seeded(id: &ElementId) -> Self {
        Self {
            name: default_field_name(ElementTag::OptIn, id),
            label: "I agree to the terms and conditions".to_string(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        Self {
            name: node.text("name"),
            label: node.text("label"),
            required: node.flag("required"),
            read_more_screen: navigate_target(node.object("on-click-action")),
        }
    }
}
