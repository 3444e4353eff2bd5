//! Reconciles a screen's free visual order with the document structure.
//!
//! The canvas lets a footer sit anywhere while editing. The document needs
//! it last, and needs form fields gathered into one group. This module
//! reports where the two disagree and repairs the minimum needed to compile.

use serde::{Deserialize, Serialize};

use crate::validation::{Diagnostic, DiagnosticCode};
use crate::{ElementId, Screen};

/// The implicit form group of a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormGrouping {
    /// Form fields in visual order.
    pub members: Vec<ElementId>,
    /// Visual index of the first member; where the group node is emitted.
    pub anchor: Option<usize>,
}

impl FormGrouping {
    /// Derive the grouping from a screen's current order.
    #[must_use]
    pub fn of(screen: &Screen) -> Self {
        let anchor = screen.elements.iter().position(|e| e.is_form_field());
        let members = screen.form_fields().map(|e| e.id).collect();
        Self { members, anchor }
    }

    /// Whether the screen has no form fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of [`sync_visual_order_with_json`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// The repaired screen.
    pub screen: Screen,
    /// Form group of the repaired screen.
    pub grouping: FormGrouping,
    /// Whether any element changed position.
    pub moved: bool,
}

/// Report ordering problems without changing the screen.
#[must_use]
pub fn validate_component_order(screen: &Screen) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let elements = &screen.elements;

    let terminals: Vec<usize> = elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_terminal_action())
        .map(|(i, _)| i)
        .collect();

    if let Some(&extra) = terminals.get(1) {
        out.push(
            Diagnostic::error(
                DiagnosticCode::MultipleTerminalActions,
                format!("Screen has {} footers; only one is allowed", terminals.len()),
            )
            .on_element(elements[extra].id),
        );
    }

    for &i in &terminals {
        if elements[i + 1..].iter().any(|e| !e.is_terminal_action()) {
            out.push(
                Diagnostic::error(DiagnosticCode::TerminalNotLast, "Footer must be the last element")
                    .on_element(elements[i].id),
            );
        }
    }

    let first = elements.iter().position(|e| e.is_form_field());
    let last = elements.iter().rposition(|e| e.is_form_field());
    if let (Some(first), Some(last)) = (first, last) {
        for element in &elements[first..last] {
            if !element.is_form_field() && !element.is_terminal_action() {
                out.push(
                    Diagnostic::warning(
                        DiagnosticCode::InterleavedFormField,
                        format!(
                            "{} sits between form fields and will be placed outside the form",
                            element.tag()
                        ),
                    )
                    .on_element(element.id),
                );
            }
        }
    }

    out
}

/// Move terminal actions to the end, keeping every other element in place.
///
/// The partition is stable, so applying it twice changes nothing.
#[must_use]
pub fn sync_visual_order_with_json(screen: &Screen) -> SyncOutcome {
    let (mut ordered, terminals): (Vec<_>, Vec<_>) = screen
        .elements
        .iter()
        .cloned()
        .partition(|e| !e.is_terminal_action());
    ordered.extend(terminals);

    let moved = ordered
        .iter()
        .zip(&screen.elements)
        .any(|(a, b)| a.id != b.id);
    if moved {
        tracing::debug!("Moved footer to the end of screen {}", screen.id);
    }

    let screen = Screen {
        elements: ordered,
        ..screen.clone()
    };
    SyncOutcome {
        grouping: FormGrouping::of(&screen),
        screen,
        moved,
    }
}
