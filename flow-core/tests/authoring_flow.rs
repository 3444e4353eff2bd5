//! Authoring pipeline integration tests.
//!
//! Builds a two-screen sign-up flow through the store, then checks:
//! - validation of components, screens and the whole flow
//! - the compiled document shape
//! - import and re-export stability
//! - the editor's drop, tick and export loop

use flow_core::components::{Footer, FooterAction, SelectOption, TextCaption, TextInput};
use flow_core::{
    compile, import_json, validate_component, validate_flow, validate_screen, CanvasStore,
    CompileConfig, DiagnosticCode, Editor, Element, ElementId, ElementKind, ElementTag, Screen, ScreenId,
    ValidationConfig,
};
use serde_json::Value;

/// Replace the content of an element in the store.
fn edit(store: &mut CanvasStore, screen: &ScreenId, id: ElementId, kind: ElementKind) {
    let element = Element { id, kind };
    assert!(store.update_element(screen, element));
}

/// Build a valid sign-up flow: details screen navigating to a terminal
/// confirmation screen.
fn signup_store() -> (CanvasStore, ScreenId, ScreenId) {
    let mut store = CanvasStore::new();
    let details = ScreenId::from("DETAILS");
    assert!(store.replace_screens(vec![Screen::new(details.clone(), "Your details")]));

    store.add_element(&details, ElementTag::TextHeading);
    let name = store.add_element(&details, ElementTag::TextInput).expect("input");
    edit(
        &mut store,
        &details,
        name,
        ElementKind::TextInput(TextInput {
            name: "full_name".to_string(),
            label: "Full name".to_string(),
            required: true,
            ..TextInput::default()
        }),
    );
    let plan = store.add_element(&details, ElementTag::RadioButtonsGroup).expect("radio");
    if let Some(ElementKind::RadioButtonsGroup(mut radio)) = store
        .snapshot()
        .screen(&details)
        .and_then(|s| s.element(plan))
        .map(|e| e.kind.clone())
    {
        radio.name = "plan".to_string();
        radio.label = "Plan".to_string();
        radio.options = vec![SelectOption::new("Basic"), SelectOption::new("Pro")];
        edit(&mut store, &details, plan, ElementKind::RadioButtonsGroup(radio));
    }
    let next = store.add_element(&details, ElementTag::Footer).expect("footer");

    let confirm = store.add_screen();
    assert!(store.update_screen(&confirm, "All set", true));
    let caption = store.add_element(&confirm, ElementTag::TextCaption).expect("caption");
    edit(
        &mut store,
        &confirm,
        caption,
        ElementKind::TextCaption(TextCaption {
            text: "We will be in touch.".to_string(),
            ..TextCaption::default()
        }),
    );
    store.add_element(&confirm, ElementTag::Footer);

    edit(
        &mut store,
        &details,
        next,
        ElementKind::Footer(Footer {
            label: "Next".to_string(),
            action: FooterAction::Navigate,
            next_screen: Some(confirm.to_string()),
            payload_keys: vec!["full_name".to_string(), "plan".to_string()],
            ..Footer::default()
        }),
    );

    (store, details, confirm)
}

#[test]
fn test_signup_flow_is_valid() {
    let (store, _, _) = signup_store();
    let snapshot = store.snapshot();
    let config = ValidationConfig {
        check_payload_keys: true,
        ..ValidationConfig::default()
    };
    let report = validate_flow(&snapshot.screens, &config);
    assert!(report.is_valid, "{:#?}", report.diagnostics().collect::<Vec<_>>());
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn test_compiled_document_shape() {
    let (store, details, confirm) = signup_store();
    let snapshot = store.snapshot();
    let doc = compile(&snapshot.screens, &CompileConfig::default().with_routing_model());
    let json: Value = serde_json::from_str(&doc.to_json_pretty().expect("json")).expect("parse");

    assert_eq!(json["version"], "7.0");
    assert_eq!(json["routing_model"][details.as_str()][0], confirm.as_str());

    let children = &json["screens"][0]["layout"]["children"];
    assert_eq!(children[0]["type"], "TextHeading");
    assert_eq!(children[1]["type"], "Form");
    assert_eq!(children[1]["children"][0]["name"], "full_name");
    assert_eq!(children[1]["children"][1]["data-source"][1]["id"], "pro");
    assert_eq!(children[2]["type"], "Footer");
    let action = &children[2]["on-click-action"];
    assert_eq!(action["name"], "navigate");
    assert_eq!(action["payload"]["plan"], "${form.plan}");

    let second = &json["screens"][1];
    assert_eq!(second["terminal"], true);
    assert!(second["layout"]["children"]
        .as_array()
        .is_some_and(|c| c.iter().all(|n| n["type"] != "Form")));
}

#[test]
fn test_reimport_is_byte_stable() {
    let (store, _, _) = signup_store();
    let config = CompileConfig::default().with_routing_model();
    let exported = compile(&store.snapshot().screens, &config)
        .to_json()
        .expect("json");

    let screens = import_json(&exported).expect("import");
    let mut reloaded = CanvasStore::from_screens(screens).expect("store");
    let reexported = compile(&reloaded.snapshot().screens, &config)
        .to_json()
        .expect("json");
    assert_eq!(exported, reexported);

    let active = reloaded.snapshot().active.clone();
    assert!(reloaded.add_element(&active, ElementTag::TextBody).is_some());
}

#[test]
fn test_caption_over_limit_and_inverted_bounds() {
    let caption = Element::with_kind(ElementKind::TextCaption(TextCaption {
        text: "c".repeat(401),
        ..TextCaption::default()
    }));
    let report = validate_component(&caption);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].limit, Some(400));
    assert_eq!(report.errors[0].current, Some(401));

    let mut group = Element::new(ElementTag::CheckboxGroup);
    if let ElementKind::CheckboxGroup(g) = &mut group.kind {
        g.min_selected_items = Some(3);
        g.max_selected_items = Some(2);
    }
    let report = validate_component(&group);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, DiagnosticCode::InvertedBounds);
}

#[test]
fn test_duplicate_ids_flagged_in_addition_to_element_errors() {
    let (store, details, _) = signup_store();
    let snapshot = store.snapshot();
    let mut screen = snapshot.screen(&details).cloned().expect("screen");
    let mut clash = Element::with_kind(ElementKind::TextCaption(TextCaption::default()));
    clash.id = screen.elements[0].id;
    screen.elements.insert(1, clash);

    let report = validate_screen(&screen);
    let codes: Vec<_> = report.errors.iter().map(|d| d.code).collect();
    assert!(codes.contains(&DiagnosticCode::DuplicateElementId));
    assert!(codes.contains(&DiagnosticCode::EmptyText));
    assert!(!report.is_valid);
}

#[test]
fn test_unresolved_navigation_target() {
    let (mut store, _, confirm) = signup_store();
    let details = store.snapshot().screens[0].id.clone();
    assert!(store.remove_screen(&confirm));
    let report = validate_flow(&store.snapshot().screens, &ValidationConfig::default());
    let codes: Vec<_> = report.errors.iter().map(|d| d.code).collect();
    assert!(codes.contains(&DiagnosticCode::UnknownScreen));
    assert!(codes.contains(&DiagnosticCode::NoTerminalScreen));
    assert_eq!(store.snapshot().active, details);
}

#[test]
fn test_editor_round() {
    let (store, details, _) = signup_store();
    let mut editor = Editor::with_store(store, ValidationConfig::default(), CompileConfig::default());

    assert!(editor.after_drop(&details, 3, 0));
    let before_tick = editor.diagnostics(&details).expect("report");
    assert!(before_tick
        .errors
        .iter()
        .any(|d| d.code == DiagnosticCode::TerminalNotLast));
    assert_eq!(editor.tick(), 1);
    assert_eq!(editor.diagnostics(&details), Some(before_tick));

    let outcome = editor.export();
    assert!(outcome.is_valid);
    let children = &outcome.document.screens[0].layout.children;
    assert_eq!(children.last().and_then(|c| c["type"].as_str()), Some("Footer"));
}
