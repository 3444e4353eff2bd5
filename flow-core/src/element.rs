//! Canvas elements - the typed components placed on a screen.
//!
//! Every variant is declared once in the `element_kinds!` table below. The
//! table generates the [`ElementTag`] enum, the [`ElementKind`] tagged union and
//! the dispatch to each variant's [`Component`] implementation, so validation,
//! compilation, import and previews all share one per-variant definition.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::components::{self, Component, Construct, NodeReader};
use crate::{FlowError, FlowResult};

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from the canonical UUID string form.
    ///
    /// # Errors
    ///
    /// Returns an error if `s` is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Six lowercase hex characters, used to seed default field names.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..6].to_string()
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of a variant in the compiled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text and media; never grouped.
    Presentational,
    /// Clickable navigation that is not a form field.
    Navigation,
    /// Interactive input nested in the form group.
    FormField,
    /// The footer ending the screen.
    TerminalAction,
}

macro_rules! element_kinds {
    ($( $(#[$doc:meta])* $name:ident => $role:ident ),+ $(,)?) => {
        /// Tag identifying an element variant; equal to its wire `type`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ElementTag {
            $( $(#[$doc])* $name, )+
        }

        impl ElementTag {
            /// Every tag, in palette order.
            pub const ALL: &'static [ElementTag] = &[$(ElementTag::$name),+];

            /// Wire name of the variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(ElementTag::$name => stringify!($name),)+
                }
            }

            /// Structural role of the variant.
            #[must_use]
            pub const fn role(self) -> Role {
                match self {
                    $(ElementTag::$name => Role::$role,)+
                }
            }

            /// Look a tag up by wire name.
            #[must_use]
            pub fn from_wire(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($name) => Some(ElementTag::$name),)+
                    _ => None,
                }
            }
        }

        /// The content of an element; one variant per component type.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum ElementKind {
            $( $(#[$doc])* $name(components::$name), )+
        }

        impl ElementKind {
            /// The variant's tag.
            #[must_use]
            pub fn tag(&self) -> ElementTag {
                match self {
                    $(ElementKind::$name(_) => ElementTag::$name,)+
                }
            }

            /// Behaviour of this variant.
            #[must_use]
            pub fn component(&self) -> &dyn Component {
                match self {
                    $(ElementKind::$name(c) => c,)+
                }
            }

            /// Mutable behaviour of this variant.
            pub fn component_mut(&mut self) -> &mut dyn Component {
                match self {
                    $(ElementKind::$name(c) => c,)+
                }
            }

            /// Default content for a new element of `tag`.
            #[must_use]
            pub fn default_for(tag: ElementTag, id: &ElementId) -> Self {
                match tag {
                    $(ElementTag::$name => ElementKind::$name(components::$name::seeded(id)),)+
                }
            }

            /// Rebuild content from a document node.
            ///
            /// # Errors
            ///
            /// Returns [`FlowError::UnknownComponent`] for an unknown `type`.
            pub fn from_node(node: NodeReader<'_>) -> FlowResult<Self> {
                let tag = ElementTag::from_wire(node.node_type())
                    .ok_or_else(|| FlowError::UnknownComponent(node.node_type().to_string()))?;
                Ok(match tag {
                    $(ElementTag::$name => ElementKind::$name(components::$name::from_node(node)),)+
                })
            }
        }
    };
}

element_kinds! {
    /// Large title text.
    TextHeading => Presentational,
    /// Secondary title text.
    TextSubheading => Presentational,
    /// Paragraph text.
    TextBody => Presentational,
    /// Small print.
    TextCaption => Presentational,
    /// Markdown document block.
    RichText => Presentational,
    /// Single image.
    Image => Presentational,
    /// Up to three swipeable images.
    ImageCarousel => Presentational,
    /// Inline link to a screen or URL.
    EmbeddedLink => Navigation,
    /// List of items each opening a screen.
    NavigationList => Navigation,
    /// Single-line input.
    TextInput => FormField,
    /// Multi-line input.
    TextArea => FormField,
    /// Multiple choice with checkboxes.
    CheckboxGroup => FormField,
    /// Single choice with radio buttons.
    RadioButtonsGroup => FormField,
    /// Multiple choice with chips.
    ChipsSelector => FormField,
    /// Single choice from a dropdown.
    Dropdown => FormField,
    /// Consent checkbox.
    OptIn => FormField,
    /// Single date.
    DatePicker => FormField,
    /// Date or date range on a calendar.
    CalendarPicker => FormField,
    /// Photo upload.
    PhotoPicker => FormField,
    /// Document upload.
    DocumentPicker => FormField,
    /// Terminal action button.
    Footer => TerminalAction,
}

impl std::fmt::Display for ElementTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canvas element with its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier within the screen.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
}

impl Element {
    /// Create a new element of `tag` with default field values.
    #[must_use]
    pub fn new(tag: ElementTag) -> Self {
        let id = ElementId::new();
        Self {
            kind: ElementKind::default_for(tag, &id),
            id,
        }
    }

    /// Create an element with the given content and a fresh id.
    #[must_use]
    pub fn with_kind(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
        }
    }

    /// The variant's tag.
    #[must_use]
    pub fn tag(&self) -> ElementTag {
        self.kind.tag()
    }

    /// The variant's structural role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.kind.tag().role()
    }

    /// Whether this element is nested in the form group on export.
    #[must_use]
    pub fn is_form_field(&self) -> bool {
        self.role() == Role::FormField
    }

    /// Whether this element is the screen's terminal action.
    #[must_use]
    pub fn is_terminal_action(&self) -> bool {
        self.role() == Role::TerminalAction
    }

    /// Behaviour of this element's variant.
    #[must_use]
    pub fn component(&self) -> &dyn Component {
        self.kind.component()
    }

    /// Copy this element under a fresh id, keeping every other field.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: ElementId::new(),
            kind: self.kind.clone(),
        }
    }
}
