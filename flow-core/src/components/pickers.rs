//! Date, calendar, photo and document pickers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{default_field_name, form_field, Component, Construct, NodeReader, NodeWriter, Preview, WireContext};
use crate::validation::{
    DiagnosticCode, Rules, MAX_DATE_LABEL_LEN, MAX_DESCRIPTION_LEN, MAX_FILE_SIZE_KB,
    MAX_HELPER_TEXT_LEN, MAX_SELECTOR_LABEL_LEN, MAX_UPLOADS,
};
use crate::{ElementId, ElementTag};

fn read_strings(node: &NodeReader<'_>, key: &str) -> Vec<String> {
    node.array(key)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn write_strings(values: &[String]) -> Vec<Value> {
    values.iter().cloned().map(Value::String).collect()
}

/// Single date picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatePicker {
    /// Submitted field name.
    pub name: String,
    /// Label above the picker.
    pub label: String,
    /// Hint under the picker.
    pub helper_text: Option<String>,
    /// Must be answered before submitting.
    pub required: bool,
    /// Earliest selectable date, `YYYY-MM-DD`.
    pub min_date: Option<String>,
    /// Latest selectable date, `YYYY-MM-DD`.
    pub max_date: Option<String>,
    /// Dates that cannot be picked.
    pub unavailable_dates: Vec<String>,
}

impl Component for DatePicker {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.field_name(&self.name);
        rules.text("label", &self.label, MAX_DATE_LABEL_LEN, "Label is required");
        rules.opt_length("helper-text", self.helper_text.as_deref(), MAX_HELPER_TEXT_LEN);
        rules.date_bounds("min-date", "max-date", self.min_date.as_deref(), self.max_date.as_deref());
        for date in &self.unavailable_dates {
            rules.date("unavailable-dates", Some(date));
        }
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let mut node = NodeWriter::new("DatePicker");
        node.text("name", &self.name)
            .text("label", &self.label)
            .opt_text("helper-text", self.helper_text.as_deref())
            .flag("required", self.required)
            .opt_text("min-date", self.min_date.as_deref())
            .opt_text("max-date", self.max_date.as_deref())
            .non_empty("unavailable-dates", write_strings(&self.unavailable_dates));
        node.build()
    }

    fn render(&self) -> Preview {
        Preview::new("Date picker", self.label.clone())
    }

    form_field!();
}

impl Construct for DatePicker {
    fn seeded(id: &ElementId) -> Self {
        Self {
            name: default_field_name(ElementTag::DatePicker, id),
            label: "Date".to_string(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        Self {
            name: node.text("name"),
            label: node.text("label"),
            helper_text: node.opt_text("helper-text"),
            required: node.flag("required"),
            min_date: node.opt_text("min-date"),
            max_date: node.opt_text("max-date"),
            unavailable_dates: read_strings(&node, "unavailable-dates"),
        }
    }
}

/// Calendar selection mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarMode {
    /// One date.
    #[default]
    Single,
    /// A start and end date.
    Range,
}

/// Calendar date or date-range picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarPicker {
    /// Submitted field name.
    pub name: String,
    /// Label above the calendar.
    pub label: String,
    /// Hint under the calendar.
    pub helper_text: Option<String>,
    /// Must be answered before submitting.
    pub required: bool,
    /// Single date or range.
    pub mode: CalendarMode,
    /// Earliest selectable date, `YYYY-MM-DD`.
    pub min_date: Option<String>,
    /// Latest selectable date, `YYYY-MM-DD`.
    pub max_date: Option<String>,
    /// Shortest range in days.
    pub min_days: Option<u32>,
    /// Longest range in days.
    pub max_days: Option<u32>,
}

impl Component for CalendarPicker {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.field_name(&self.name);
        rules.text("label", &self.label, MAX_DATE_LABEL_LEN, "Label is required");
        rules.opt_length("helper-text", self.helper_text.as_deref(), MAX_HELPER_TEXT_LEN);
        rules.date_bounds("min-date", "max-date", self.min_date.as_deref(), self.max_date.as_deref());
        rules.bounds("min-days", "max-days", self.min_days, self.max_days);
        if self.mode == CalendarMode::Single && (self.min_days.is_some() || self.max_days.is_some()) {
            rules.warning(
                DiagnosticCode::InvalidValue,
                "mode",
                "Day limits only apply to range calendars",
            );
        }
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let mut node = NodeWriter::new("CalendarPicker");
        node.text("name", &self.name)
            .text("label", &self.label)
            .opt_text("helper-text", self.helper_text.as_deref())
            .flag("required", self.required)
            .non_default("mode", &self.mode, &CalendarMode::Single)
            .opt_text("min-date", self.min_date.as_deref())
            .opt_text("max-date", self.max_date.as_deref())
            .opt_number("min-days", self.min_days)
            .opt_number("max-days", self.max_days);
        node.build()
    }

    fn render(&self) -> Preview {
        let mode = match self.mode {
            CalendarMode::Single => "",
            CalendarMode::Range => " (range)",
        };
        Preview::new("Calendar", format!("{}{mode}", self.label))
    }

    form_field!();
}

impl Construct for CalendarPicker {
    fn seeded(id: &ElementId) -> Self {
        Self {
            name: default_field_name(ElementTag::CalendarPicker, id),
            label: "Pick a date".to_string(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        Self {
            name: node.text("name"),
            label: node.text("label"),
            helper_text: node.opt_text("helper-text"),
            required: node.flag("required"),
            mode: node.parse_or_default("mode"),
            min_date: node.opt_text("min-date"),
            max_date: node.opt_text("max-date"),
            min_days: node.opt_u32("min-days"),
            max_days: node.opt_u32("max-days"),
        }
    }
}

/// Where photos may come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSource {
    /// Camera or gallery.
    #[default]
    CameraGallery,
    /// Camera only.
    Camera,
    /// Gallery only.
    Gallery,
}

/// Photo upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoPicker {
    /// Submitted field name.
    pub name: String,
    /// Label above the picker.
    pub label: String,
    /// Text under the label.
    pub description: Option<String>,
    /// Allowed sources.
    pub photo_source: PhotoSource,
    /// Largest file accepted, in kilobytes.
    pub max_file_size_kb: Option<u32>,
    /// Fewest photos to upload.
    pub min_uploaded_photos: Option<u32>,
    /// Most photos to upload.
    pub max_uploaded_photos: Option<u32>,
}

impl Component for PhotoPicker {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.field_name(&self.name);
        rules.text("label", &self.label, MAX_SELECTOR_LABEL_LEN, "Label is required");
        rules.opt_length("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        rules.at_most("max-file-size-kb", self.max_file_size_kb, MAX_FILE_SIZE_KB, "the upload limit");
        rules.at_most("min-uploaded-photos", self.min_uploaded_photos, MAX_UPLOADS, "the photo limit");
        rules.at_most("max-uploaded-photos", self.max_uploaded_photos, MAX_UPLOADS, "the photo limit");
        rules.bounds(
            "min-uploaded-photos",
            "max-uploaded-photos",
            self.min_uploaded_photos,
            self.max_uploaded_photos,
        );
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let mut node = NodeWriter::new("PhotoPicker");
        node.text("name", &self.name)
            .text("label", &self.label)
            .opt_text("description", self.description.as_deref())
            .non_default("photo-source", &self.photo_source, &PhotoSource::CameraGallery)
            .opt_number("max-file-size-kb", self.max_file_size_kb)
            .opt_number("min-uploaded-photos", self.min_uploaded_photos)
            .opt_number("max-uploaded-photos", self.max_uploaded_photos);
        node.build()
    }

    fn render(&self) -> Preview {
        Preview::new("Photo picker", self.label.clone())
    }

    form_field!();
}

impl Construct for PhotoPicker {
    fn seeded(id: &ElementId) -> Self {
        Self {
            name: default_field_name(ElementTag::PhotoPicker, id),
            label: "Upload photos".to_string(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        Self {
            name: node.text("name"),
            label: node.text("label"),
            description: node.opt_text("description"),
            photo_source: node.parse_or_default("photo-source"),
            max_file_size_kb: node.opt_u32("max-file-size-kb"),
            min_uploaded_photos: node.opt_u32("min-uploaded-photos"),
            max_uploaded_photos: node.opt_u32("max-uploaded-photos"),
        }
    }
}

/// Document upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPicker {
    /// Submitted field name.
    pub name: String,
    /// Label above the picker.
    pub label: String,
    /// Text under the label.
    pub description: Option<String>,
    /// Accepted MIME types; empty accepts any.
    pub allowed_mime_types: Vec<String>,
    /// Largest file accepted, in kilobytes.
    pub max_file_size_kb: Option<u32>,
    /// Fewest documents to upload.
    pub min_uploaded_documents: Option<u32>,
    /// Most documents to upload.
    pub max_uploaded_documents: Option<u32>,
}

impl Component for DocumentPicker {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.field_name(&self.name);
        rules.text("label", &self.label, MAX_SELECTOR_LABEL_LEN, "Label is required");
        rules.opt_length("description", self.description.as_deref(), MAX_DESCRIPTION_LEN);
        for mime in &self.allowed_mime_types {
            let well_formed = mime
                .split_once('/')
                .is_some_and(|(kind, sub)| !kind.is_empty() && !sub.is_empty());
            if !well_formed {
                rules.error(
                    DiagnosticCode::InvalidValue,
                    "allowed-mime-types",
                    format!("'{mime}' is not a MIME type"),
                );
            }
        }
        rules.at_most("max-file-size-kb", self.max_file_size_kb, MAX_FILE_SIZE_KB, "the upload limit");
        rules.at_most(
            "min-uploaded-documents",
            self.min_uploaded_documents,
            MAX_UPLOADS,
            "the document limit",
        );
        rules.at_most(
            "max-uploaded-documents",
            self.max_uploaded_documents,
            MAX_UPLOADS,
            "the document limit",
        );
        rules.bounds(
            "min-uploaded-documents",
            "max-uploaded-documents",
            self.min_uploaded_documents,
            self.max_uploaded_documents,
        );
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let mut node = NodeWriter::new("DocumentPicker");
        node.text("name", &self.name)
            .text("label", &self.label)
            .opt_text("description", self.description.as_deref())
            .non_empty("allowed-mime-types", write_strings(&self.allowed_mime_types))
            .opt_number("max-file-size-kb", self.max_file_size_kb)
            .opt_number("min-uploaded-documents", self.min_uploaded_documents)
            .opt_number("max-uploaded-documents", self.max_uploaded_documents);
        node.build()
    }

    fn render(&self) -> Preview {
        Preview::new("Document picker", self.label.clone())
    }

    form_field!();
}

impl Construct for DocumentPicker {
    fn seeded(id: &ElementId) -> Self {
        Self {
            name: default_field_name(ElementTag::DocumentPicker, id),
            label: "Upload documents".to_string(),
            ..Self::default()
        }
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        Self {
            name: node.text("name"),
            label: node.text("label"),
            description: node.opt_text("description"),
            allowed_mime_types: read_strings(&node, "allowed-mime-types"),
            max_file_size_kb: node.opt_u32("max-file-size-kb"),
            min_uploaded_documents: node.opt_u32("min-uploaded-documents"),
            max_uploaded_documents: node.opt_u32("max-uploaded-documents"),
        }
    }
}
