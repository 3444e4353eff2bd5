//! The footer: a screen's terminal action button.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::wire::{navigate_action, navigate_target};
use super::{Component, Construct, NodeReader, NodeWriter, Preview, WireContext};
use crate::validation::{DiagnosticCode, Rules, MAX_FOOTER_CAPTION_LEN, MAX_FOOTER_LABEL_LEN};
use crate::ElementId;

/// What the footer button does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FooterAction {
    /// End the flow and submit the payload.
    #[default]
    Complete,
    /// Open `next_screen`.
    Navigate,
    /// Send the payload to the flow's data endpoint.
    DataExchange,
}

impl FooterAction {
    /// Action name on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Navigate => "navigate",
            Self::DataExchange => "data_exchange",
        }
    }
}

/// Terminal action button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    /// Button text.
    pub label: String,
    /// Button behaviour.
    pub action: FooterAction,
    /// Target screen for [`FooterAction::Navigate`].
    pub next_screen: Option<String>,
    /// Form fields submitted with the action.
    ///
    /// The wire payload is an object, so keys read back from a document come
    /// in sorted order.
    pub payload_keys: Vec<String>,
    /// Caption left of the button.
    pub left_caption: Option<String>,
    /// Caption centred under the button.
    pub center_caption: Option<String>,
    /// Caption right of the button.
    pub right_caption: Option<String>,
}

impl Footer {
    fn payload(&self, ctx: &WireContext<'_>) -> Map<String, Value> {
        self.payload_keys
            .iter()
            .map(|key| {
                let reference = format!("${{{}.{key}}}", ctx.form_name);
                (key.clone(), Value::String(reference))
            })
            .collect()
    }

    fn target(&self) -> Option<&str> {
        match self.action {
            FooterAction::Navigate => self.next_screen.as_deref().filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

fn is_set(caption: Option<&str>) -> bool {
    caption.is_some_and(|c| !c.trim().is_empty())
}

impl Component for Footer {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.text("label", &self.label, MAX_FOOTER_LABEL_LEN, "Footer label is required");
        rules.opt_length("left-caption", self.left_caption.as_deref(), MAX_FOOTER_CAPTION_LEN);
        rules.opt_length("center-caption", self.center_caption.as_deref(), MAX_FOOTER_CAPTION_LEN);
        rules.opt_length("right-caption", self.right_caption.as_deref(), MAX_FOOTER_CAPTION_LEN);
        if is_set(self.center_caption.as_deref())
            && (is_set(self.left_caption.as_deref()) || is_set(self.right_caption.as_deref()))
        {
            rules.error(
                DiagnosticCode::InvalidValue,
                "center-caption",
                "A center caption cannot be combined with left or right captions",
            );
        }
        if self.action == FooterAction::Navigate && self.target().is_none() {
            rules.error(
                DiagnosticCode::MissingField,
                "on-click-action",
                "Navigate action has no target screen",
            );
        }

        let mut seen = HashSet::new();
        for key in &self.payload_keys {
            if key.trim().is_empty() {
                rules.error(DiagnosticCode::InvalidValue, "payload", "Payload key must not be empty");
            } else if !seen.insert(key.as_str()) {
                rules.error(
                    DiagnosticCode::DuplicatePayloadKey,
                    "payload",
                    format!("Payload key '{key}' is listed more than once"),
                );
            }
        }
    }

    fn to_node(&self, ctx: &WireContext<'_>) -> Value {
        let payload = self.payload(ctx);
        let action = match self.action {
            FooterAction::Navigate => {
                navigate_action(self.next_screen.as_deref().unwrap_or_default(), payload)
            }
            other => serde_json::json!({ "name": other.as_str(), "payload": payload }),
        };
        let mut node = NodeWriter::new("Footer");
        node.text("label", &self.label)
            .opt_text("left-caption", self.left_caption.as_deref())
            .opt_text("center-caption", self.center_caption.as_deref())
            .opt_text("right-caption", self.right_caption.as_deref())
            .value("on-click-action", action);
        node.build()
    }

    fn render(&self) -> Preview {
        let summary = match self.target() {
            Some(next) => format!("{} → {next}", self.label),
            None => format!("{} ({})", self.label, self.action.as_str()),
        };
        Preview::new("Footer", summary)
    }

    fn navigation_targets(&self) -> Vec<&str> {
        self.target().into_iter().collect()
    }

    fn payload_keys(&self) -> &[String] {
        &self.payload_keys
    }
}

impl Construct for Footer {
    fn seeded(_id: &ElementId) -> Self {
        Self {
            label: "Continue".to_string(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        let action = node.object("on-click-action");
        let kind = match action.map(|a| a.text("name")).as_deref() {
            Some("navigate") => FooterAction::Navigate,
            Some("data_exchange") => FooterAction::DataExchange,
            Some("complete") | None => FooterAction::Complete,
            Some(other) => {
                tracing::warn!("Unknown footer action `{other}`, treating as complete");
                FooterAction::Complete
            }
        };
        let payload_keys = action
            .and_then(|a| a.raw("payload"))
            .and_then(Value::as_object)
            .map(|payload| payload.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            label: node.text("label"),
            action: kind,
            next_screen: navigate_target(action),
            payload_keys,
            left_caption: node.opt_text("left-caption"),
            center_caption: node.opt_text("center-caption"),
            right_caption: node.opt_text("right-caption"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_component;
    use crate::{Element, ElementKind};

    fn codes(footer: Footer) -> Vec<DiagnosticCode> {
        validate_component(&Element::with_kind(ElementKind::Footer(footer)))
            .errors
            .into_iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn test_payload_references_form() {
        let footer = Footer {
            label: "Submit".to_string(),
            payload_keys: vec!["email".to_string(), "age".to_string()],
            ..Footer::default()
        };
        let node = footer.to_node(&WireContext::default());
        assert_eq!(node["on-click-action"]["name"], "complete");
        assert_eq!(node["on-click-action"]["payload"]["email"], "${form.email}");
        assert_eq!(node["on-click-action"]["payload"]["age"], "${form.age}");

        let node = footer.to_node(&WireContext { form_name: "signup" });
        assert_eq!(node["on-click-action"]["payload"]["email"], "${signup.email}");
    }

    #[test]
    fn test_payload_keys_read_back_sorted() {
        let footer = Footer {
            label: "Submit".to_string(),
            payload_keys: vec!["email".to_string(), "age".to_string()],
            ..Footer::default()
        };
        let node = footer.to_node(&WireContext::default());
        let read = Footer::from_node(NodeReader::new(&node).expect("object"));
        assert_eq!(read.payload_keys, vec!["age", "email"]);
        assert_eq!(read.to_node(&WireContext::default()), node);
    }

    #[test]
    fn test_navigate_footer() {
        let footer = Footer {
            label: "Next".to_string(),
            action: FooterAction::Navigate,
            next_screen: Some("DETAILS".to_string()),
            ..Footer::default()
        };
        let node = footer.to_node(&WireContext::default());
        assert_eq!(node["on-click-action"]["next"]["name"], "DETAILS");
        assert_eq!(footer.navigation_targets(), vec!["DETAILS"]);
        assert_eq!(Footer::from_node(NodeReader::new(&node).expect("object")), footer);
    }

    #[test]
    fn test_navigate_without_target() {
        let footer = Footer {
            label: "Next".to_string(),
            action: FooterAction::Navigate,
            ..Footer::default()
        };
        assert_eq!(codes(footer), vec![DiagnosticCode::MissingField]);
    }

    #[test]
    fn test_caption_combination() {
        let footer = Footer {
            label: "Pay".to_string(),
            left_caption: Some("Total".to_string()),
            center_caption: Some("Secure".to_string()),
            ..Footer::default()
        };
        assert_eq!(codes(footer), vec![DiagnosticCode::InvalidValue]);
    }

    #[test]
    fn test_duplicate_payload_keys() {
        let footer = Footer {
            label: "Send".to_string(),
            payload_keys: vec!["a".to_string(), "a".to_string()],
            ..Footer::default()
        };
        assert_eq!(codes(footer), vec![DiagnosticCode::DuplicatePayloadKey]);
    }

    #[test]
    fn test_label_limit() {
        let footer = Footer {
            label: "x".repeat(36),
            ..Footer::default()
        };
        let report = validate_component(&Element::with_kind(ElementKind::Footer(footer)));
        assert_eq!(report.errors[0].limit, Some(35));
        assert_eq!(report.errors[0].current, Some(36));
    }
}
