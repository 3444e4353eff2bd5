//! Screens: ordered element lists forming one page of a flow.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Element, ElementId};

/// Letters appended to `SCREEN_` in generated ids.
const GENERATED_SUFFIX_LEN: usize = 6;

/// Identifier of a screen, unique across a flow.
///
/// Valid ids consist of ASCII letters and underscores only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(String);

impl ScreenId {
    /// Generate a fresh id such as `SCREEN_KDPAFB`.
    #[must_use]
    pub fn generate() -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .bytes()
            .take(GENERATED_SUFFIX_LEN)
            .map(|b| {
                let nibble = match b {
                    b'0'..=b'9' => b - b'0',
                    _ => b - b'a' + 10,
                };
                char::from(b'A' + nibble)
            })
            .collect();
        Self(format!("SCREEN_{suffix}"))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is non-empty and made of ASCII letters and underscores.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
    }
}

impl From<&str> for ScreenId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ScreenId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    /// Unique id.
    pub id: ScreenId,
    /// Title shown in the header.
    pub title: String,
    /// Whether the flow may end on this screen.
    #[serde(default)]
    pub terminal: bool,
    /// Re-request data when the user navigates back.
    #[serde(default)]
    pub refresh_on_back: bool,
    /// Data declaration, passed through to the document unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Elements in visual order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Screen {
    /// Create an empty screen.
    #[must_use]
    pub fn new(id: ScreenId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            terminal: false,
            refresh_on_back: false,
            data: None,
            elements: Vec::new(),
        }
    }

    /// Index of the element with `id`.
    #[must_use]
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Get an element by id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Form fields in visual order.
    pub fn form_fields(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_form_field())
    }

    /// Whether any element is a form field.
    #[must_use]
    pub fn has_form(&self) -> bool {
        self.elements.iter().any(Element::is_form_field)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the screen has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Copy under a new id, giving every element a fresh id.
    #[must_use]
    pub fn duplicate(&self, id: ScreenId) -> Self {
        Self {
            id,
            elements: self.elements.iter().map(Element::duplicate).collect(),
            ..self.clone()
        }
    }
}
