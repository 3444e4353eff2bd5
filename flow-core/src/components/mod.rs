//! Per-variant component behaviour.
//!
//! Each element variant is a plain struct implementing [`Component`] (rules,
//! serialization, preview) and [`Construct`] (defaults and import). The
//! dispatch from [`ElementKind`](crate::ElementKind) to these impls is generated
//! in [`crate::element`].

mod footer;
mod inputs;
mod media;
mod navigation;
pub mod options;
mod pickers;
mod selection;
mod text;
mod wire;

use serde_json::Value;

use crate::validation::Rules;
use crate::{ElementId, ElementTag};

pub use footer::{Footer, FooterAction};
pub use inputs::{InputType, TextArea, TextInput};
pub use media::{AspectRatio, CarouselImage, Image, ImageCarousel, ScaleType};
pub use navigation::{EmbeddedLink, LinkAction, NavItem, NavigationList};
pub use options::SelectOption;
pub use pickers::{CalendarMode, CalendarPicker, DatePicker, DocumentPicker, PhotoPicker, PhotoSource};
pub use selection::{CheckboxGroup, ChipsSelector, Dropdown, OptIn, RadioButtonsGroup};
pub use text::{FontWeight, RichText, TextBody, TextCaption, TextHeading, TextStyle, TextSubheading};
pub use wire::{NodeReader, NodeWriter};

/// Settings shared by every node written during one compilation.
#[derive(Debug, Clone, Copy)]
pub struct WireContext<'a> {
    /// Name of the form group, used in `${form.<field>}` payload references.
    pub form_name: &'a str,
}

impl Default for WireContext<'_> {
    fn default() -> Self {
        Self { form_name: "form" }
    }
}

/// Short textual rendering of a component for side panels and outlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Human name of the component type.
    pub label: &'static str,
    /// The most telling content (text, label, option count, ...).
    pub summary: String,
}

impl Preview {
    fn new(label: &'static str, summary: impl Into<String>) -> Self {
        Self {
            label,
            summary: summary.into(),
        }
    }
}

impl std::fmt::Display for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.summary.is_empty() {
            f.write_str(self.label)
        } else {
            write!(f, "{}: {}", self.label, self.summary)
        }
    }
}

/// Behaviour every element variant supplies once.
pub trait Component {
    /// Apply this variant's validation rules.
    fn validate(&self, rules: &mut Rules<'_>);

    /// Serialize to a document node, omitting fields left at their defaults.
    fn to_node(&self, ctx: &WireContext<'_>) -> Value;

    /// Short rendering for panels.
    fn render(&self) -> Preview;

    /// Submitted field name, for form fields.
    fn field_name(&self) -> Option<&str> {
        None
    }

    /// Mutable field name, for form fields.
    fn field_name_mut(&mut self) -> Option<&mut String> {
        None
    }

    /// Screen ids this component can navigate to.
    fn navigation_targets(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Payload keys submitted by a terminal action.
    fn payload_keys(&self) -> &[String] {
        &[]
    }
}

/// Construction of a variant from defaults or from a document node.
pub trait Construct: Sized {
    /// Default content for a new element with id `id`.
    fn seeded(id: &ElementId) -> Self;

    /// Rebuild from a document node; absent attributes take their defaults.
    fn from_node(node: NodeReader<'_>) -> Self;
}

/// Implements the field-name accessors for structs with a `name` field.
macro_rules! form_field {
    () => {
        fn field_name(&self) -> Option<&str> {
            Some(&self.name)
        }

        fn field_name_mut(&mut self) -> Option<&mut String> {
            Some(&mut self.name)
        }
    };
}
pub(crate) use form_field;

/// Default field name for a new form field: `text_input_3f9a1c`.
#[must_use]
pub fn default_field_name(tag: ElementTag, id: &ElementId) -> String {
    format!("{}_{}", snake_case(tag.as_str()), id.short())
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("TextInput"), "text_input");
        assert_eq!(snake_case("RadioButtonsGroup"), "radio_buttons_group");
        assert_eq!(snake_case("OptIn"), "opt_in");
    }

    #[test]
    fn test_preview_display() {
        assert_eq!(Preview::new("Heading", "Welcome").to_string(), "Heading: Welcome");
        assert_eq!(Preview::new("Image", "").to_string(), "Image");
    }
}
