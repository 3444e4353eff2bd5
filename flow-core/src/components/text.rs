//! Text components.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Component, Construct, NodeReader, NodeWriter, Preview, WireContext};
use crate::validation::{
    Rules, MAX_BODY_LEN, MAX_CAPTION_LEN, MAX_HEADING_LEN, MAX_RICH_TEXT_LEN, MAX_SUBHEADING_LEN,
};
use crate::ElementId;

/// Maximum characters shown in a text preview.
const PREVIEW_CHARS: usize = 40;

/// Font weight of body and caption text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Regular text.
    #[default]
    Normal,
    /// Bold text.
    Bold,
    /// Italic text.
    Italic,
    /// Bold italic text.
    BoldItalic,
}

/// Styling shared by body and caption text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font weight.
    pub font_weight: FontWeight,
    /// Struck-through text.
    pub strikethrough: bool,
    /// Interpret the text as markdown.
    pub markdown: bool,
}

impl TextStyle {
    fn write(&self, node: &mut NodeWriter) {
        node.non_default("font-weight", &self.font_weight, &FontWeight::Normal)
            .flag("strikethrough", self.strikethrough)
            .flag("markdown", self.markdown);
    }

    fn read(node: &NodeReader<'_>) -> Self {
        Self {
            font_weight: node.parse_or_default("font-weight"),
            strikethrough: node.flag("strikethrough"),
            markdown: node.flag("markdown"),
        }
    }
}

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Text components with nothing but a `text` attribute.
macro_rules! plain_text {
    ($(#[$doc:meta])* $name:ident, $label:literal, $limit:ident, $seed:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Displayed text.
            pub text: String,
        }

        impl Component for $name {
            fn validate(&self, rules: &mut Rules<'_>) {
                rules.text("text", &self.text, $limit, concat!($label, " text is required"));
            }

            fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
                let mut node = NodeWriter::new(stringify!($name));
                node.text("text", &self.text);
                node.build()
            }

            fn render(&self) -> Preview {
                Preview::new($label, excerpt(&self.text))
            }
        }

        impl Construct for $name {
            fn seeded(_id: &ElementId) -> Self {
                Self {
                    text: $seed.to_string(),
                }
            }

            fn from_node(node: NodeReader<'_>) -> Self {
                Self {
                    text: node.text("text"),
                }
            }
        }
    };
}

/// Text components with a `text` attribute plus [`TextStyle`].
macro_rules! styled_text {
    ($(#[$doc:meta])* $name:ident, $label:literal, $limit:ident, $seed:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Displayed text.
            pub text: String,
            /// Styling.
            pub style: TextStyle,
        }

        impl Component for $name {
            fn validate(&self, rules: &mut Rules<'_>) {
                rules.text("text", &self.text, $limit, concat!($label, " text is required"));
            }

            fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
                let mut node = NodeWriter::new(stringify!($name));
                node.text("text", &self.text);
                self.style.write(&mut node);
                node.build()
            }

            fn render(&self) -> Preview {
                Preview::new($label, excerpt(&self.text))
            }
        }

        impl Construct for $name {
            fn seeded(_id: &ElementId) -> Self {
                Self {
                    text: $seed.to_string(),
                    style: TextStyle::default(),
                }
            }

            fn from_node(node: NodeReader<'_>) -> Self {
                Self {
                    text: node.text("text"),
                    style: TextStyle::read(&node),
                }
            }
        }
    };
}

plain_text!(
    /// Large title text.
    TextHeading, "Heading", MAX_HEADING_LEN, "Heading"
);
plain_text!(
    /// Secondary title text.
    TextSubheading, "Subheading", MAX_SUBHEADING_LEN, "Subheading"
);
plain_text!(
    /// Markdown block.
    RichText, "Rich text", MAX_RICH_TEXT_LEN, "Rich text"
);
styled_text!(
    /// Paragraph text.
    TextBody, "Body", MAX_BODY_LEN, "Body text"
);
styled_text!(
    /// Small print.
    TextCaption, "Caption", MAX_CAPTION_LEN, "Caption"
);
