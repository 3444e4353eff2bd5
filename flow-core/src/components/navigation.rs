//! Navigation components: embedded links and navigation lists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::options::{drop_redundant_overrides, duplicate_overrides, resolve_ids, Identified};
use super::wire::{navigate_action, navigate_target};
use super::{default_field_name, Component, Construct, NodeReader, NodeWriter, Preview, WireContext};
use crate::validation::{
    DiagnosticCode, Rules, MAX_DESCRIPTION_LEN, MAX_LINK_TEXT_LEN, MAX_NAV_ITEM_DESCRIPTION_LEN,
    MAX_NAV_LABEL_LEN, MAX_OPTION_TITLE_LEN, NAV_ITEM_RANGE,
};
use crate::{ElementId, ElementTag};

/// What an embedded link does when tapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkAction {
    /// Open another screen of the flow.
    Navigate {
        /// Target screen id.
        next_screen: String,
    },
    /// Open an external URL.
    OpenUrl {
        /// Absolute http(s) URL.
        url: String,
    },
}

impl Default for LinkAction {
    fn default() -> Self {
        Self::Navigate {
            next_screen: String::new(),
        }
    }
}

/// Inline link text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddedLink {
    /// Link text.
    pub text: String,
    /// Tap behaviour.
    pub action: LinkAction,
}

impl Component for EmbeddedLink {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.text("text", &self.text, MAX_LINK_TEXT_LEN, "Link text is required");
        match &self.action {
            LinkAction::Navigate { next_screen } if next_screen.is_empty() => {
                rules.error(
                    DiagnosticCode::MissingField,
                    "on-click-action",
                    "Link has no target screen",
                );
            }
            LinkAction::OpenUrl { url } => {
                if url.trim().is_empty() {
                    rules.error(DiagnosticCode::MissingField, "on-click-action", "Link has no URL");
                } else if !(url.starts_with("https://") || url.starts_with("http://")) {
                    rules.error(
                        DiagnosticCode::InvalidValue,
                        "on-click-action",
                        format!("'{url}' is not an http(s) URL"),
                    );
                }
            }
            LinkAction::Navigate { .. } => {}
        }
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let action = match &self.action {
            LinkAction::Navigate { next_screen } => navigate_action(next_screen, Map::new()),
            LinkAction::OpenUrl { url } => serde_json::json!({ "name": "open_url", "url": url }),
        };
        let mut node = NodeWriter::new("EmbeddedLink");
        node.text("text", &self.text).value("on-click-action", action);
        node.build()
    }

    fn render(&self) -> Preview {
        let target = match &self.action {
            LinkAction::Navigate { next_screen } => next_screen.as_str(),
            LinkAction::OpenUrl { url } => url.as_str(),
        };
        Preview::new("Link", format!("{} → {target}", self.text))
    }

    fn navigation_targets(&self) -> Vec<&str> {
        match &self.action {
            LinkAction::Navigate { next_screen } if !next_screen.is_empty() => vec![next_screen.as_str()],
            _ => Vec::new(),
        }
    }
}

impl Construct for EmbeddedLink {
    fn seeded(_id: &ElementId) -> Self {
        Self {
            text: "Learn more".to_string(),
            action: LinkAction::default(),
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        let action = node.object("on-click-action");
        let action = match action.map(|a| a.text("name")).as_deref() {
            Some("open_url") => LinkAction::OpenUrl {
                url: action.map(|a| a.text("url")).unwrap_or_default(),
            },
            _ => LinkAction::Navigate {
                next_screen: navigate_target(action).unwrap_or_default(),
            },
        };
        Self {
            text: node.text("text"),
            action,
        }
    }
}

/// One entry of a navigation list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavItem {
    /// Main line.
    pub title: String,
    /// Secondary line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Screen opened by the item.
    pub next_screen: String,
    /// Explicit item id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_override: Option<String>,
}

impl Identified for NavItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn id_override(&self) -> Option<&str> {
        self.id_override.as_deref()
    }
}

/// List of items each opening a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationList {
    /// Component name.
    pub name: String,
    /// Heading above the list.
    pub label: Option<String>,
    /// Text under the heading.
    pub description: Option<String>,
    /// Entries in display order.
    pub items: Vec<NavItem>,
}

impl Component for NavigationList {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.field_name(&self.name);
        rules.opt_length("label", self.label.as_deref(), MAX_NAV_LABEL_LEN);
        rules.opt_length("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        rules.count("list-items", self.items.len(), &NAV_ITEM_RANGE, "Navigation list");
        for item in &self.items {
            rules.text("item title", &item.title, MAX_OPTION_TITLE_LEN, "Item title is required");
            rules.opt_length(
                "item description",
                item.description.as_deref(),
                MAX_NAV_ITEM_DESCRIPTION_LEN,
            );
            if item.next_screen.is_empty() {
                rules.error(
                    DiagnosticCode::MissingField,
                    "list-items",
                    format!("Item '{}' has no target screen", item.title),
                );
            }
        }
        for id in duplicate_overrides(&self.items) {
            rules.error(
                DiagnosticCode::DuplicateOptionId,
                "list-items",
                format!("Item id '{id}' is used more than once"),
            );
        }
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let items = resolve_ids(&self.items)
            .into_iter()
            .zip(&self.items)
            .map(|(id, item)| {
                let mut content = NodeWriter::default();
                content
                    .text("title", &item.title)
                    .opt_text("description", item.description.as_deref());
                let mut node = NodeWriter::default();
                node.text("id", &id)
                    .value("main-content", content.build())
                    .value("on-click-action", navigate_action(&item.next_screen, Map::new()));
                node.build()
            })
            .collect();
        let mut node = NodeWriter::new("NavigationList");
        node.text("name", &self.name)
            .opt_text("label", self.label.as_deref())
            .opt_text("description", self.description.as_deref())
            .value("list-items", Value::Array(items));
        node.build()
    }

    fn render(&self) -> Preview {
        Preview::new("Navigation list", format!("{} items", self.items.len()))
    }

    fn navigation_targets(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|i| i.next_screen.as_str())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Construct for NavigationList {
    fn seeded(id: &ElementId) -> Self {
        Self {
            name: default_field_name(ElementTag::NavigationList, id),
            items: (1..=2)
                .map(|n| NavItem {
                    title: format!("Item {n}"),
                    ..NavItem::default()
                })
                .collect(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        let mut items: Vec<NavItem> = node
            .array("list-items")
            .iter()
            .filter_map(|v| NodeReader::new(v).ok())
            .map(|item| {
                let content = item.object("main-content");
                NavItem {
                    title: content.map(|c| c.text("title")).unwrap_or_default(),
                    description: content.and_then(|c| c.opt_text("description")),
                    next_screen: navigate_target(item.object("on-click-action")).unwrap_or_default(),
                    id_override: item.opt_text("id"),
                }
            })
            .collect();
        drop_redundant_overrides(&mut items, |i| &mut i.id_override);
        Self {
            name: node.text("name"),
            label: node.opt_text("label"),
            description: node.opt_text("description"),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_component;
    use crate::{Element, ElementKind};

    #[test]
    fn test_link_node_and_targets() {
        let link = EmbeddedLink {
            text: "Terms".to_string(),
            action: LinkAction::Navigate {
                next_screen: "TERMS".to_string(),
            },
        };
        let node = link.to_node(&WireContext::default());
        assert_eq!(node["on-click-action"]["next"]["name"], "TERMS");
        assert_eq!(link.navigation_targets(), vec!["TERMS"]);
        assert_eq!(EmbeddedLink::from_node(NodeReader::new(&node).expect("object")), link);
    }

    #[test]
    fn test_open_url_link() {
        let link = EmbeddedLink {
            text: "Site".to_string(),
            action: LinkAction::OpenUrl {
                url: "ftp://example.com".to_string(),
            },
        };
        assert!(link.navigation_targets().is_empty());
        let report = validate_component(&Element::with_kind(ElementKind::EmbeddedLink(link.clone())));
        assert_eq!(report.errors[0].code, DiagnosticCode::InvalidValue);

        let node = link.to_node(&WireContext::default());
        assert_eq!(node["on-click-action"]["name"], "open_url");
        assert_eq!(EmbeddedLink::from_node(NodeReader::new(&node).expect("object")), link);
    }

    #[test]
    fn test_seeded_link_needs_target() {
        let element = Element::new(ElementTag::EmbeddedLink);
        let report = validate_component(&element);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code, DiagnosticCode::MissingField);
    }

    #[test]
    fn test_navigation_list_round_trip() {
        let list = NavigationList {
            name: "menu".to_string(),
            label: Some("Pick one".to_string()),
            description: None,
            items: vec![
                NavItem {
                    title: "Plans".to_string(),
                    next_screen: "PLANS".to_string(),
                    ..NavItem::default()
                },
                NavItem {
                    title: "Help".to_string(),
                    description: Some("FAQ".to_string()),
                    next_screen: "HELP".to_string(),
                    id_override: Some("support".to_string()),
                },
            ],
        };
        let node = list.to_node(&WireContext::default());
        assert_eq!(node["list-items"][0]["id"], "plans");
        assert_eq!(node["list-items"][1]["id"], "support");
        assert_eq!(node["list-items"][1]["main-content"]["description"], "FAQ");
        assert_eq!(list.navigation_targets(), vec!["PLANS", "HELP"]);
        assert_eq!(NavigationList::from_node(NodeReader::new(&node).expect("object")), list);
    }

    #[test]
    fn test_navigation_list_item_limits() {
        let list = NavigationList {
            name: "menu".to_string(),
            items: vec![NavItem {
                title: "Plans".to_string(),
                description: Some("a description that is far too long".to_string()),
                next_screen: "PLANS".to_string(),
                id_override: None,
            }],
            ..NavigationList::default()
        };
        let report = validate_component(&Element::with_kind(ElementKind::NavigationList(list)));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].limit, Some(MAX_NAV_ITEM_DESCRIPTION_LEN));
    }
}
