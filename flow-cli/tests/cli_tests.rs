//! flowctl command tests over temporary files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use flow_cli::{run, Cli, Outcome};
use flow_core::{CompileConfig, Element, ElementTag, FlowDocument, Screen, ScreenId};
use serde_json::Value;
use tempfile::TempDir;

fn write_canvas(dir: &Path, screens: &[Screen]) -> PathBuf {
    let path = dir.join("canvas.json");
    fs::write(&path, serde_json::to_string(screens).expect("encode")).expect("write");
    path
}

fn terminal_screen(tags: &[ElementTag]) -> Screen {
    let mut screen = Screen::new(ScreenId::from("DONE"), "Done");
    screen.terminal = true;
    screen.elements = tags.iter().copied().map(Element::new).collect();
    screen
}

fn run_args(args: &[&str]) -> (Outcome, String) {
    let cli = Cli::parse_from(args);
    let mut out = Vec::new();
    let outcome = run(&cli, &mut out).expect("run");
    (outcome, String::from_utf8(out).expect("utf8"))
}

#[test]
fn test_validate_valid_canvas() {
    let dir = TempDir::new().expect("tempdir");
    let canvas = write_canvas(
        dir.path(),
        &[terminal_screen(&[ElementTag::TextBody, ElementTag::Footer])],
    );

    let (outcome, out) = run_args(&["flowctl", "validate", canvas.to_str().expect("path")]);
    assert_eq!(outcome, Outcome::Success);
    assert!(out.contains("0 error(s)"));
}

#[test]
fn test_validate_reports_errors() {
    let dir = TempDir::new().expect("tempdir");
    let canvas = write_canvas(
        dir.path(),
        &[terminal_screen(&[ElementTag::Footer, ElementTag::TextBody])],
    );

    let (outcome, out) = run_args(&["flowctl", "validate", canvas.to_str().expect("path")]);
    assert_eq!(outcome, Outcome::Invalid);
    assert!(out.lines().any(|l| l.starts_with("error [DONE]")));
}

#[test]
fn test_validate_json_report() {
    let dir = TempDir::new().expect("tempdir");
    let canvas = write_canvas(dir.path(), &[terminal_screen(&[ElementTag::TextBody])]);

    let (outcome, out) = run_args(&[
        "flowctl",
        "validate",
        "--json",
        canvas.to_str().expect("path"),
    ]);
    assert_eq!(outcome, Outcome::Invalid);
    let report: Value = serde_json::from_str(&out).expect("json");
    assert_eq!(report["is_valid"], false);
    assert_eq!(report["screens"][0]["errors"][0]["code"], "terminal_without_footer");
}

#[test]
fn test_compile_sync_writes_document() {
    let dir = TempDir::new().expect("tempdir");
    let canvas = write_canvas(
        dir.path(),
        &[terminal_screen(&[
            ElementTag::Footer,
            ElementTag::TextHeading,
            ElementTag::TextInput,
        ])],
    );
    let output = dir.path().join("flow.json");

    let (outcome, out) = run_args(&[
        "flowctl",
        "compile",
        canvas.to_str().expect("path"),
        "-o",
        output.to_str().expect("path"),
        "--flow-version",
        "6.3",
        "--routing-model",
        "--sync",
    ]);
    assert_eq!(outcome, Outcome::Success);
    assert!(out.is_empty());

    let doc = FlowDocument::from_json(&fs::read_to_string(&output).expect("read")).expect("doc");
    assert_eq!(doc.version, "6.3");
    assert!(doc.routing_model.is_some());
    let children = &doc.screens[0].layout.children;
    assert_eq!(children[0]["type"], "TextHeading");
    assert_eq!(children[1]["type"], "Form");
    assert_eq!(children[2]["type"], "Footer");
}

#[test]
fn test_compile_to_stdout() {
    let dir = TempDir::new().expect("tempdir");
    let canvas = write_canvas(
        dir.path(),
        &[terminal_screen(&[ElementTag::TextBody, ElementTag::Footer])],
    );

    let (_, out) = run_args(&["flowctl", "compile", canvas.to_str().expect("path")]);
    let doc: Value = serde_json::from_str(&out).expect("json");
    assert!(doc.get("routing_model").is_none());
    assert_eq!(doc["screens"][0]["id"], "DONE");
}

#[test]
fn test_import_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let screens = [terminal_screen(&[ElementTag::CheckboxGroup, ElementTag::Footer])];
    let flow = dir.path().join("flow.json");
    let document = flow_core::compile(&screens, &CompileConfig::default());
    fs::write(&flow, document.to_json().expect("json")).expect("write");
    let canvas = dir.path().join("canvas.json");

    let (outcome, _) = run_args(&[
        "flowctl",
        "import",
        flow.to_str().expect("path"),
        "--output",
        canvas.to_str().expect("path"),
    ]);
    assert_eq!(outcome, Outcome::Success);

    let imported: Vec<Screen> =
        serde_json::from_str(&fs::read_to_string(&canvas).expect("read")).expect("canvas");
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].elements.len(), 2);
    assert_eq!(flow_core::compile(&imported, &CompileConfig::default()), document);
}

#[test]
fn test_missing_input_is_an_error() {
    let cli = Cli::parse_from(["flowctl", "validate", "/nonexistent/canvas.json"]);
    let err = run(&cli, &mut Vec::<u8>::new()).expect_err("missing file");
    assert!(err.to_string().contains("Failed to read canvas file"));
}

#[test]
fn test_import_rejects_empty_document() {
    let dir = TempDir::new().expect("tempdir");
    let flow = dir.path().join("flow.json");
    fs::write(&flow, r#"{"version":"7.0","screens":[]}"#).expect("write");

    let cli = Cli::parse_from(["flowctl", "import", flow.to_str().expect("path")]);
    assert!(run(&cli, &mut Vec::<u8>::new()).is_err());
}
