//! The exported flow document and the compiler producing it.
//!
//! Compilation is a pure function of the screen list and [`CompileConfig`].
//! Output is byte-for-byte stable: struct fields serialize in declaration
//! order and every node map is key-sorted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::components::WireContext;
use crate::{CompileConfig, FlowResult, Screen};

/// Layout type of every screen.
pub const LAYOUT_TYPE: &str = "SingleColumnLayout";

/// Wire type of the form group node.
pub const FORM_TYPE: &str = "Form";

/// Versioned multi-screen flow document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDocument {
    /// Document format version.
    pub version: String,
    /// Version of the data exchange API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_api_version: Option<String>,
    /// Screen id to the screens it can navigate to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_model: Option<BTreeMap<String, Vec<String>>>,
    /// Screens in flow order.
    pub screens: Vec<ScreenDocument>,
}

/// One screen of a [`FlowDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenDocument {
    /// Screen id.
    pub id: String,
    /// Header title.
    pub title: String,
    /// Whether the flow may end here.
    #[serde(default, skip_serializing_if = "is_false")]
    pub terminal: bool,
    /// Re-request data on back navigation.
    #[serde(default, skip_serializing_if = "is_false")]
    pub refresh_on_back: bool,
    /// Data declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Component tree.
    pub layout: LayoutDocument,
}

/// Single-column layout holding the component nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Always [`LAYOUT_TYPE`].
    #[serde(rename = "type")]
    pub layout_type: String,
    /// Component nodes in order.
    #[serde(default)]
    pub children: Vec<Value>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

impl FlowDocument {
    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> FlowResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> FlowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a flow document.
    pub fn from_json(json: &str) -> FlowResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Find a screen by id.
    #[must_use]
    pub fn screen(&self, id: &str) -> Option<&ScreenDocument> {
        self.screens.iter().find(|s| s.id == id)
    }
}

/// Compile screens into a flow document.
///
/// Validation is not re-run; invalid content compiles to its best-effort
/// representation.
#[must_use]
pub fn compile(screens: &[Screen], config: &CompileConfig) -> FlowDocument {
    let ctx = WireContext {
        form_name: &config.form_name,
    };
    let documents: Vec<ScreenDocument> = screens.iter().map(|s| compile_screen(s, &ctx)).collect();
    tracing::debug!("Compiled {} screens", documents.len());

    FlowDocument {
        version: config.flow_version.clone(),
        data_api_version: config.data_api_version.clone(),
        routing_model: config.routing_model.then(|| routing_model(screens)),
        screens: documents,
    }
}

fn compile_screen(screen: &Screen, ctx: &WireContext<'_>) -> ScreenDocument {
    let mut children = Vec::with_capacity(screen.elements.len());
    let mut form_slot = None;
    let mut form_children = Vec::new();
    let mut terminals = Vec::new();

    for element in &screen.elements {
        let node = element.component().to_node(ctx);
        if element.is_terminal_action() {
            terminals.push(node);
        } else if element.is_form_field() {
            if form_slot.is_none() {
                form_slot = Some(children.len());
                children.push(Value::Null);
            }
            form_children.push(node);
        } else {
            children.push(node);
        }
    }

    if let Some(slot) = form_slot {
        children[slot] = serde_json::json!({
            "type": FORM_TYPE,
            "name": ctx.form_name,
            "children": form_children,
        });
    }
    children.extend(terminals);

    ScreenDocument {
        id: screen.id.to_string(),
        title: screen.title.clone(),
        terminal: screen.terminal,
        refresh_on_back: screen.refresh_on_back,
        data: screen.data.clone(),
        layout: LayoutDocument {
            layout_type: LAYOUT_TYPE.to_string(),
            children,
        },
    }
}

/// Screen id to the sorted, de-duplicated ids it navigates to.
#[must_use]
pub fn routing_model(screens: &[Screen]) -> BTreeMap<String, Vec<String>> {
    screens
        .iter()
        .map(|screen| {
            let mut targets: Vec<String> = screen
                .elements
                .iter()
                .flat_map(|e| e.component().navigation_targets())
                .map(str::to_string)
                .collect();
            targets.sort();
            targets.dedup();
            (screen.id.to_string(), targets)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Footer, FooterAction};
    use crate::{Element, ElementKind, ElementTag, ScreenId};

    fn screen(id: &str, tags: &[ElementTag]) -> Screen {
        let mut screen = Screen::new(ScreenId::from(id), id);
        screen.elements = tags.iter().map(|t| Element::new(*t)).collect();
        screen
    }

    fn types(doc: &ScreenDocument) -> Vec<&str> {
        doc.layout
            .children
            .iter()
            .map(|c| c["type"].as_str().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_screen_without_fields_has_no_form() {
        let s = screen("INFO", &[ElementTag::TextHeading, ElementTag::TextBody, ElementTag::Footer]);
        let doc = compile(&[s], &CompileConfig::default());
        assert_eq!(types(&doc.screens[0]), vec!["TextHeading", "TextBody", "Footer"]);
    }

    #[test]
    fn test_form_at_first_field_position() {
        let s = screen(
            "SIGNUP",
            &[
                ElementTag::TextHeading,
                ElementTag::TextInput,
                ElementTag::TextCaption,
                ElementTag::Dropdown,
                ElementTag::Image,
                ElementTag::Footer,
            ],
        );
        let doc = compile(&[s], &CompileConfig::default());
        let screen = &doc.screens[0];
        assert_eq!(types(screen), vec!["TextHeading", "Form", "TextCaption", "Image", "Footer"]);
        let form = &screen.layout.children[1];
        assert_eq!(form["name"], "form");
        let nested: Vec<_> = form["children"]
            .as_array()
            .map(|c| c.iter().map(|n| n["type"].clone()).collect())
            .unwrap_or_default();
        assert_eq!(nested, vec!["TextInput", "Dropdown"]);
    }

    #[test]
    fn test_footer_emitted_last_even_when_placed_first() {
        let s = screen("FIRST", &[ElementTag::Footer, ElementTag::TextBody]);
        let doc = compile(&[s], &CompileConfig::default());
        assert_eq!(types(&doc.screens[0]), vec!["TextBody", "Footer"]);
    }

    #[test]
    fn test_document_shape() {
        let mut s = screen("DONE", &[ElementTag::Footer]);
        s.terminal = true;
        let doc = compile(&[s], &CompileConfig::default().with_data_api_version("3.0"));
        let json: Value = serde_json::from_str(&doc.to_json().expect("json")).expect("parse");
        assert_eq!(json["version"], "7.0");
        assert_eq!(json["data_api_version"], "3.0");
        assert!(json.get("routing_model").is_none());
        assert_eq!(json["screens"][0]["terminal"], true);
        assert!(json["screens"][0].get("refresh_on_back").is_none());
        assert_eq!(json["screens"][0]["layout"]["type"], LAYOUT_TYPE);
    }

    #[test]
    fn test_routing_model() {
        let mut first = screen("FIRST", &[ElementTag::TextBody]);
        first.elements.push(Element::with_kind(ElementKind::Footer(Footer {
            label: "Next".to_string(),
            action: FooterAction::Navigate,
            next_screen: Some("SECOND".to_string()),
            ..Footer::default()
        })));
        let second = screen("SECOND", &[ElementTag::Footer]);

        let doc = compile(&[first, second], &CompileConfig::default().with_routing_model());
        let routing = doc.routing_model.expect("routing model");
        assert_eq!(routing["FIRST"], vec!["SECOND".to_string()]);
        assert!(routing["SECOND"].is_empty());
    }

    #[test]
    fn test_custom_form_name() {
        let s = screen("A", &[ElementTag::TextInput]);
        let config = CompileConfig {
            form_name: "details".to_string(),
            ..CompileConfig::default()
        };
        let doc = compile(&[s], &config);
        assert_eq!(doc.screens[0].layout.children[0]["name"], "details");
    }

    #[test]
    fn test_compile_is_deterministic() {
        let screens = vec![
            screen("A", &[ElementTag::TextHeading, ElementTag::CheckboxGroup, ElementTag::Footer]),
            screen("B", &[ElementTag::NavigationList, ElementTag::DatePicker]),
        ];
        let config = CompileConfig::default().with_routing_model();
        let first = compile(&screens, &config).to_json_pretty().expect("json");
        let second = compile(&screens, &config).to_json_pretty().expect("json");
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_round_trip() {
        let doc = compile(&[screen("A", &[ElementTag::TextInput])], &CompileConfig::default());
        let json = doc.to_json().expect("json");
        assert_eq!(FlowDocument::from_json(&json).expect("parse"), doc);
        assert!(FlowDocument::from_json("{").is_err());
    }
}
