//! # Flow Canvas Core
//!
//! Authoring model for multi-screen interactive forms and the compiler that
//! turns it into a flow document for messaging platforms.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  flow-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Canvas Store    │  Validation Engine       │
//! │  - Screens       │  - Component rules       │
//! │  - Elements      │  - Screen structure      │
//! │  - Snapshots     │  - Flow references       │
//! ├─────────────────────────────────────────────┤
//! │  Order Sync      │  Document Compiler       │
//! │  - Footer last   │  - Form grouping         │
//! │  - Form grouping │  - Import                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every component type is declared once in [`element`]; its rules, wire
//! format and preview live together in [`components`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod config;
pub mod document;
pub mod editor;
pub mod element;
pub mod error;
pub mod import;
pub mod order;
pub mod screen;
pub mod store;
pub mod validation;

pub use config::{CompileConfig, ValidationConfig};
pub use document::{compile, FlowDocument, LayoutDocument, ScreenDocument};
pub use editor::{Editor, ExportOutcome};
pub use element::{Element, ElementId, ElementKind, ElementTag, Role};
pub use error::{FlowError, FlowResult};
pub use import::{import_document, import_json};
pub use order::{sync_visual_order_with_json, validate_component_order, FormGrouping, SyncOutcome};
pub use screen::{Screen, ScreenId};
pub use store::{CanvasSnapshot, CanvasStore, SubscriptionId};
pub use validation::{
    validate_component, validate_flow, validate_screen, ComponentReport, Diagnostic,
    DiagnosticCode, FlowReport, ScreenReport, Severity,
};

/// Flow core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
