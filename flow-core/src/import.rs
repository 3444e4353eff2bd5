//! Rebuilds canvas screens from a compiled flow document.

use crate::components::NodeReader;
use crate::document::FORM_TYPE;
use crate::{Element, ElementKind, FlowDocument, FlowError, FlowResult, Screen, ScreenId};

/// Convert a document back into screens with fresh element ids.
///
/// Form groups are unwrapped in place. Attributes that are absent or
/// malformed take their defaults. Footer payload keys come back in sorted
/// order, which compiles to the same bytes as the authored order.
///
/// # Errors
///
/// Returns [`FlowError::EmptyCanvas`] if the document has no screens,
/// [`FlowError::UnknownComponent`] for an unrecognized node type and
/// [`FlowError::InvalidDocument`] for a node that is not an object.
pub fn import_document(document: &FlowDocument) -> FlowResult<Vec<Screen>> {
    if document.screens.is_empty() {
        return Err(FlowError::EmptyCanvas);
    }

    let screens = document
        .screens
        .iter()
        .map(|doc| {
            let mut elements = Vec::with_capacity(doc.layout.children.len());
            for child in &doc.layout.children {
                let node = NodeReader::new(child)?;
                if node.node_type() == FORM_TYPE {
                    for member in node.array("children") {
                        elements.push(read_element(member)?);
                    }
                } else {
                    elements.push(read_element(child)?);
                }
            }
            Ok(Screen {
                id: ScreenId::from(doc.id.as_str()),
                title: doc.title.clone(),
                terminal: doc.terminal,
                refresh_on_back: doc.refresh_on_back,
                data: doc.data.clone(),
                elements,
            })
        })
        .collect::<FlowResult<Vec<_>>>()?;

    tracing::debug!("Imported {} screens", screens.len());
    Ok(screens)
}

/// Parse a JSON document and import it.
///
/// # Errors
///
/// Returns an error if `json` is not a flow document or cannot be imported.
pub fn import_json(json: &str) -> FlowResult<Vec<Screen>> {
    import_document(&FlowDocument::from_json(json)?)
}

fn read_element(value: &serde_json::Value) -> FlowResult<Element> {
    let kind = ElementKind::from_node(NodeReader::new(value)?)?;
    Ok(Element::with_kind(kind))
}
