//! Validation of components, screens and whole flows.
//!
//! Validation never fails: every finding is returned as a [`Diagnostic`] and
//! the caller decides what to do with it. The functions here are pure, so the
//! editor may call them on every keystroke without touching the store.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::components::options::{duplicate_overrides, SelectOption};
use crate::order::validate_component_order;
use crate::{Element, ElementId, Role, Screen, ScreenId, ValidationConfig};

/// Maximum length for heading text.
pub const MAX_HEADING_LEN: usize = 80;
/// Maximum length for subheading text.
pub const MAX_SUBHEADING_LEN: usize = 80;
/// Maximum length for body text.
pub const MAX_BODY_LEN: usize = 4096;
/// Maximum length for caption text.
pub const MAX_CAPTION_LEN: usize = 400;
/// Maximum length for rich text.
pub const MAX_RICH_TEXT_LEN: usize = 4096;
/// Maximum length for text input, text area and dropdown labels.
pub const MAX_INPUT_LABEL_LEN: usize = 20;
/// Maximum length for checkbox, radio and picker labels.
pub const MAX_SELECTOR_LABEL_LEN: usize = 30;
/// Maximum length for chips selector and navigation list labels.
pub const MAX_CHIPS_LABEL_LEN: usize = 80;
/// Maximum length for navigation list labels.
pub const MAX_NAV_LABEL_LEN: usize = 80;
/// Maximum length for opt-in labels.
pub const MAX_OPT_IN_LABEL_LEN: usize = 120;
/// Maximum length for date and calendar picker labels.
pub const MAX_DATE_LABEL_LEN: usize = 40;
/// Maximum length for helper text.
pub const MAX_HELPER_TEXT_LEN: usize = 80;
/// Maximum length for component descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 300;
/// Maximum length for option titles.
pub const MAX_OPTION_TITLE_LEN: usize = 30;
/// Maximum length for option descriptions.
pub const MAX_OPTION_DESCRIPTION_LEN: usize = 300;
/// Maximum length for navigation item descriptions.
pub const MAX_NAV_ITEM_DESCRIPTION_LEN: usize = 20;
/// Maximum length for footer labels.
pub const MAX_FOOTER_LABEL_LEN: usize = 35;
/// Maximum length for footer captions.
pub const MAX_FOOTER_CAPTION_LEN: usize = 15;
/// Maximum length for embedded link text.
pub const MAX_LINK_TEXT_LEN: usize = 25;
/// Maximum length for screen titles.
pub const MAX_SCREEN_TITLE_LEN: usize = 30;
/// Maximum `max-length` of a text area.
pub const MAX_TEXT_AREA_LENGTH: usize = 600;
/// Options allowed on checkbox, radio and chips selectors.
pub const OPTION_RANGE: RangeInclusive<usize> = 1..=20;
/// Options allowed on a chips selector.
pub const CHIPS_OPTION_RANGE: RangeInclusive<usize> = 2..=20;
/// Options allowed on a dropdown.
pub const DROPDOWN_OPTION_RANGE: RangeInclusive<usize> = 1..=200;
/// Items allowed in a navigation list.
pub const NAV_ITEM_RANGE: RangeInclusive<usize> = 1..=20;
/// Images allowed in a carousel.
pub const CAROUSEL_IMAGE_RANGE: RangeInclusive<usize> = 1..=3;
/// Maximum photos or documents per picker.
pub const MAX_UPLOADS: usize = 30;
/// Maximum upload size in kilobytes.
pub const MAX_FILE_SIZE_KB: usize = 25_600;
/// Screen id reserved by the target platform.
pub const RESERVED_SCREEN_ID: &str = "SUCCESS";

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Hard rule violation; the screen is not valid.
    Error,
    /// Advisory finding; never affects validity.
    Warning,
}

/// Machine-readable rule identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// Required text left blank.
    EmptyText,
    /// Text over its character limit.
    TooLong,
    /// Text close to its character limit.
    NearLimit,
    /// Required attribute missing.
    MissingField,
    /// Field name with characters outside `[A-Za-z0-9_]`.
    InvalidName,
    /// `min` greater than `max`.
    InvertedBounds,
    /// Numeric attribute above its ceiling.
    ExceedsLimit,
    /// Item count outside the allowed range.
    ItemCount,
    /// Two options share an explicit id.
    DuplicateOptionId,
    /// Date not in `YYYY-MM-DD` form.
    InvalidDate,
    /// Attribute with an unusable value.
    InvalidValue,
    /// Image without alternative text.
    MissingAltText,
    /// Two elements share an id.
    DuplicateElementId,
    /// More than one terminal action on a screen.
    MultipleTerminalActions,
    /// Terminal action placed before other elements.
    TerminalNotLast,
    /// Non-form element between form fields.
    InterleavedFormField,
    /// Two form fields share a name.
    DuplicateFieldName,
    /// Screen id not made of letters and underscores, or reserved.
    InvalidScreenId,
    /// Screen title left blank.
    EmptyTitle,
    /// Terminal screen with no footer.
    TerminalWithoutFooter,
    /// Footer completes the flow from a non-terminal screen.
    CompleteOnNonTerminal,
    /// Two screens share an id.
    DuplicateScreenId,
    /// Navigation to a screen that does not exist.
    UnknownScreen,
    /// No screen ends the flow.
    NoTerminalScreen,
    /// Payload key with no matching field on the screen.
    UndeclaredPayloadKey,
    /// Payload key listed twice.
    DuplicatePayloadKey,
}

/// A structured validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Rule that produced the finding.
    pub code: DiagnosticCode,
    /// Human-readable message.
    pub message: String,
    /// Screen the finding belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_id: Option<ScreenId>,
    /// Element the finding belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<ElementId>,
    /// Attribute the finding is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Limit that was crossed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Value measured against `limit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<usize>,
}

impl Diagnostic {
    /// Create an error.
    #[must_use]
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning.
    #[must_use]
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            screen_id: None,
            element_id: None,
            field: None,
            limit: None,
            current: None,
        }
    }

    /// Attach the owning screen.
    #[must_use]
    pub fn on_screen(mut self, id: &ScreenId) -> Self {
        self.screen_id = Some(id.clone());
        self
    }

    /// Attach the owning element.
    #[must_use]
    pub fn on_element(mut self, id: ElementId) -> Self {
        self.element_id = Some(id);
        self
    }

    /// Attach the attribute name.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach the limit and measured value.
    #[must_use]
    pub fn with_measure(mut self, limit: usize, current: usize) -> Self {
        self.limit = Some(limit);
        self.current = Some(current);
        self
    }

    /// Whether this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}")?;
        if let Some(screen) = &self.screen_id {
            write!(f, " [{screen}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Findings for a single component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentReport {
    /// Hard rule violations.
    pub errors: Vec<Diagnostic>,
    /// Advisory findings.
    pub warnings: Vec<Diagnostic>,
}

impl ComponentReport {
    /// File a diagnostic under its severity.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    /// Whether no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Findings for a screen and all of its elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenReport {
    /// Screen the report is for.
    pub screen_id: ScreenId,
    /// Element and screen-level errors.
    pub errors: Vec<Diagnostic>,
    /// Element and screen-level warnings.
    pub warnings: Vec<Diagnostic>,
    /// `true` iff `errors` is empty.
    pub is_valid: bool,
}

/// Findings for a whole flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowReport {
    /// Per-screen reports, in screen order.
    pub screens: Vec<ScreenReport>,
    /// Cross-screen errors.
    pub errors: Vec<Diagnostic>,
    /// Cross-screen warnings.
    pub warnings: Vec<Diagnostic>,
    /// `true` iff no screen or flow-level error exists.
    pub is_valid: bool,
}

impl FlowReport {
    /// Every diagnostic in the report, flow-level first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .chain(self.screens.iter().flat_map(|s| s.errors.iter().chain(&s.warnings)))
    }

    /// Total number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len() + self.screens.iter().map(|s| s.errors.len()).sum::<usize>()
    }

    /// Total number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len() + self.screens.iter().map(|s| s.warnings.len()).sum::<usize>()
    }
}

/// Rule helpers handed to each component's `validate`.
#[derive(Debug)]
pub struct Rules<'a> {
    element_id: ElementId,
    config: &'a ValidationConfig,
    report: ComponentReport,
}

impl<'a> Rules<'a> {
    fn new(element_id: ElementId, config: &'a ValidationConfig) -> Self {
        Self {
            element_id,
            config,
            report: ComponentReport::default(),
        }
    }

    /// Record an error on `field`.
    pub fn error(&mut self, code: DiagnosticCode, field: &str, message: impl Into<String>) {
        self.push(Diagnostic::error(code, message).with_field(field));
    }

    /// Record a warning on `field`.
    pub fn warning(&mut self, code: DiagnosticCode, field: &str, message: impl Into<String>) {
        self.push(Diagnostic::warning(code, message).with_field(field));
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.report.push(diagnostic.on_element(self.element_id));
    }

    /// Blank text is an error.
    pub fn required(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.error(DiagnosticCode::EmptyText, field, message);
        }
    }

    /// Text over `limit` characters is an error; text near it is a warning.
    pub fn length(&mut self, field: &str, value: &str, limit: usize) {
        let current = value.chars().count();
        if current > limit {
            self.push(
                Diagnostic::error(
                    DiagnosticCode::TooLong,
                    format!("{field} is {current} characters, over the {limit} character limit"),
                )
                .with_field(field)
                .with_measure(limit, current),
            );
        } else if current > 0 && current >= self.near_threshold(limit) {
            self.push(
                Diagnostic::warning(
                    DiagnosticCode::NearLimit,
                    format!("{field} is {current} of {limit} characters"),
                )
                .with_field(field)
                .with_measure(limit, current),
            );
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn near_threshold(&self, limit: usize) -> usize {
        let ratio = self.config.warn_ratio;
        if !(0.0..1.0).contains(&ratio) {
            return usize::MAX;
        }
        (limit as f64 * ratio).ceil() as usize
    }

    /// Required text with a character limit.
    pub fn text(&mut self, field: &str, value: &str, limit: usize, message: &str) {
        self.required(field, value, message);
        self.length(field, value, limit);
    }

    /// Optional text with a character limit.
    pub fn opt_length(&mut self, field: &str, value: Option<&str>, limit: usize) {
        if let Some(value) = value {
            self.length(field, value, limit);
        }
    }

    /// A form field name must be present and made of `[A-Za-z0-9_]`.
    pub fn field_name(&mut self, name: &str) {
        if name.trim().is_empty() {
            self.error(DiagnosticCode::MissingField, "name", "Field name is required");
        } else if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.error(
                DiagnosticCode::InvalidName,
                "name",
                format!("Field name '{name}' may only contain letters, digits and underscores"),
            );
        }
    }

    /// `min` must not exceed `max` when both are set.
    pub fn bounds(&mut self, min_field: &str, max_field: &str, min: Option<u32>, max: Option<u32>) {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                self.push(
                    Diagnostic::error(
                        DiagnosticCode::InvertedBounds,
                        format!("{min_field} ({min}) is greater than {max_field} ({max})"),
                    )
                    .with_field(min_field)
                    .with_measure(max as usize, min as usize),
                );
            }
        }
    }

    /// A numeric attribute must not exceed `limit`.
    pub fn at_most(&mut self, field: &str, value: Option<u32>, limit: usize, what: &str) {
        if let Some(value) = value {
            let current = value as usize;
            if current > limit {
                self.push(
                    Diagnostic::error(
                        DiagnosticCode::ExceedsLimit,
                        format!("{field} ({current}) exceeds {what} ({limit})"),
                    )
                    .with_field(field)
                    .with_measure(limit, current),
                );
            }
        }
    }

    /// An item count must fall in `range`.
    pub fn count(&mut self, field: &str, count: usize, range: &RangeInclusive<usize>, what: &str) {
        if range.contains(&count) {
            return;
        }
        let limit = if count < *range.start() {
            *range.start()
        } else {
            *range.end()
        };
        self.push(
            Diagnostic::error(
                DiagnosticCode::ItemCount,
                format!(
                    "{what} must have between {} and {} items, found {count}",
                    range.start(),
                    range.end()
                ),
            )
            .with_field(field)
            .with_measure(limit, count),
        );
    }

    /// Option count, titles, descriptions and explicit id uniqueness.
    pub fn options(&mut self, options: &[SelectOption], range: &RangeInclusive<usize>) {
        self.count("data-source", options.len(), range, "Options");
        for option in options {
            self.text(
                "option title",
                &option.title,
                MAX_OPTION_TITLE_LEN,
                "Option title is required",
            );
            self.opt_length(
                "option description",
                option.description.as_deref(),
                MAX_OPTION_DESCRIPTION_LEN,
            );
        }
        for id in duplicate_overrides(options) {
            self.error(
                DiagnosticCode::DuplicateOptionId,
                "data-source",
                format!("Option id '{id}' is used more than once"),
            );
        }
    }

    /// A date must parse as `YYYY-MM-DD`.
    pub fn date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let value = value?;
        match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.error(
                    DiagnosticCode::InvalidDate,
                    field,
                    format!("{field} '{value}' is not a YYYY-MM-DD date"),
                );
                None
            }
        }
    }

    /// Both dates must parse and `min` must not be after `max`.
    pub fn date_bounds(&mut self, min_field: &str, max_field: &str, min: Option<&str>, max: Option<&str>) {
        let min_date = self.date(min_field, min);
        let max_date = self.date(max_field, max);
        if let (Some(lo), Some(hi)) = (min_date, max_date) {
            if lo > hi {
                self.error(
                    DiagnosticCode::InvertedBounds,
                    min_field,
                    format!("{min_field} ({lo}) is after {max_field} ({hi})"),
                );
            }
        }
    }

    fn finish(self) -> ComponentReport {
        self.report
    }
}

/// Validate one element with the default configuration.
#[must_use]
pub fn validate_component(element: &Element) -> ComponentReport {
    validate_component_with(element, &ValidationConfig::default())
}

/// Validate one element.
#[must_use]
pub fn validate_component_with(element: &Element, config: &ValidationConfig) -> ComponentReport {
    let mut rules = Rules::new(element.id, config);
    element.component().validate(&mut rules);
    rules.finish()
}

/// Validate a screen with the default configuration.
#[must_use]
pub fn validate_screen(screen: &Screen) -> ScreenReport {
    validate_screen_with(screen, &ValidationConfig::default())
}

/// Validate a screen: every element plus screen-level structure.
#[must_use]
pub fn validate_screen_with(screen: &Screen, config: &ValidationConfig) -> ScreenReport {
    let mut report = ComponentReport::default();

    for element in &screen.elements {
        let element_report = validate_component_with(element, config);
        report.errors.extend(element_report.errors);
        report.warnings.extend(element_report.warnings);
    }

    check_screen_identity(screen, &mut report);
    check_duplicate_element_ids(screen, &mut report);
    for diagnostic in validate_component_order(screen) {
        report.push(diagnostic);
    }
    check_field_names(screen, &mut report);
    check_terminal(screen, &mut report);
    if config.check_payload_keys {
        check_payload_keys(screen, &mut report);
    }

    for diagnostic in report.errors.iter_mut().chain(report.warnings.iter_mut()) {
        diagnostic.screen_id = Some(screen.id.clone());
    }

    ScreenReport {
        screen_id: screen.id.clone(),
        is_valid: report.errors.is_empty(),
        errors: report.errors,
        warnings: report.warnings,
    }
}

fn check_screen_identity(screen: &Screen, report: &mut ComponentReport) {
    if !screen.id.is_well_formed() {
        report.push(
            Diagnostic::error(
                DiagnosticCode::InvalidScreenId,
                format!("Screen id '{}' may only contain letters and underscores", screen.id),
            )
            .with_field("id"),
        );
    } else if screen.id.as_str() == RESERVED_SCREEN_ID {
        report.push(
            Diagnostic::error(
                DiagnosticCode::InvalidScreenId,
                format!("Screen id '{RESERVED_SCREEN_ID}' is reserved"),
            )
            .with_field("id"),
        );
    }

    if screen.title.trim().is_empty() {
        report.push(Diagnostic::error(DiagnosticCode::EmptyTitle, "Screen title is required").with_field("title"));
    }
    let current = screen.title.chars().count();
    if current > MAX_SCREEN_TITLE_LEN {
        report.push(
            Diagnostic::error(
                DiagnosticCode::TooLong,
                format!("title is {current} characters, over the {MAX_SCREEN_TITLE_LEN} character limit"),
            )
            .with_field("title")
            .with_measure(MAX_SCREEN_TITLE_LEN, current),
        );
    }
}

fn check_duplicate_element_ids(screen: &Screen, report: &mut ComponentReport) {
    let mut counts: HashMap<ElementId, usize> = HashMap::new();
    for element in &screen.elements {
        *counts.entry(element.id).or_default() += 1;
    }
    let mut reported = HashSet::new();
    for element in &screen.elements {
        let count = counts[&element.id];
        if count > 1 && reported.insert(element.id) {
            report.push(
                Diagnostic::error(
                    DiagnosticCode::DuplicateElementId,
                    format!("Element id {} is used by {count} elements", element.id),
                )
                .on_element(element.id),
            );
        }
    }
}

fn check_field_names(screen: &Screen, report: &mut ComponentReport) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for element in screen.elements.iter().filter(|e| e.is_form_field()) {
        let Some(name) = element.component().field_name() else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name) && reported.insert(name) {
            report.push(
                Diagnostic::error(
                    DiagnosticCode::DuplicateFieldName,
                    format!("Field name '{name}' is used by more than one component"),
                )
                .on_element(element.id)
                .with_field("name"),
            );
        }
    }
}

fn check_terminal(screen: &Screen, report: &mut ComponentReport) {
    let footer = screen.elements.iter().find(|e| e.is_terminal_action());
    match footer {
        None if screen.terminal => report.push(Diagnostic::error(
            DiagnosticCode::TerminalWithoutFooter,
            "Terminal screen must end with a footer",
        )),
        Some(element) if !screen.terminal => {
            if let crate::ElementKind::Footer(footer) = &element.kind {
                if footer.action == crate::components::FooterAction::Complete {
                    report.push(
                        Diagnostic::warning(
                            DiagnosticCode::CompleteOnNonTerminal,
                            "Footer completes the flow but the screen is not marked terminal",
                        )
                        .on_element(element.id),
                    );
                }
            }
        }
        _ => {}
    }
}

fn check_payload_keys(screen: &Screen, report: &mut ComponentReport) {
    let names: HashSet<&str> = screen
        .elements
        .iter()
        .filter_map(|e| e.component().field_name())
        .collect();
    for element in screen.elements.iter().filter(|e| e.role() == Role::TerminalAction) {
        for key in element.component().payload_keys() {
            if !names.contains(key.as_str()) {
                report.push(
                    Diagnostic::warning(
                        DiagnosticCode::UndeclaredPayloadKey,
                        format!("Payload key '{key}' does not match any field on this screen"),
                    )
                    .on_element(element.id)
                    .with_field("payload"),
                );
            }
        }
    }
}

/// Validate every screen plus cross-screen references.
#[must_use]
pub fn validate_flow(screens: &[Screen], config: &ValidationConfig) -> FlowReport {
    let mut flow = ComponentReport::default();

    let mut seen = HashSet::new();
    for screen in screens {
        if !seen.insert(screen.id.as_str()) {
            flow.push(
                Diagnostic::error(
                    DiagnosticCode::DuplicateScreenId,
                    format!("Screen id '{}' is used more than once", screen.id),
                )
                .on_screen(&screen.id),
            );
        }
    }

    for screen in screens {
        for element in &screen.elements {
            for target in element.component().navigation_targets() {
                if !target.is_empty() && !seen.contains(target) {
                    flow.push(
                        Diagnostic::error(
                            DiagnosticCode::UnknownScreen,
                            format!("Navigation target '{target}' does not exist"),
                        )
                        .on_screen(&screen.id)
                        .on_element(element.id),
                    );
                }
            }
        }
    }

    if !screens.is_empty() && !screens.iter().any(|s| s.terminal) {
        flow.push(Diagnostic::error(
            DiagnosticCode::NoTerminalScreen,
            "At least one screen must be terminal",
        ));
    }

    let reports: Vec<ScreenReport> = screens
        .iter()
        .map(|s| validate_screen_with(s, config))
        .collect();
    let is_valid = flow.errors.is_empty() && reports.iter().all(|r| r.is_valid);

    FlowReport {
        screens: reports,
        errors: flow.errors,
        warnings: flow.warnings,
        is_valid,
    }
}
