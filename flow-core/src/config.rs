//! Validation and compilation settings.

use serde::{Deserialize, Serialize};

/// Document version written when none is configured.
pub const DEFAULT_FLOW_VERSION: &str = "7.0";

/// Name of the form group node.
pub const DEFAULT_FORM_NAME: &str = "form";

/// Settings for the validation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Fraction of a character limit at which a near-limit warning is raised.
    /// Values outside `0.0..1.0` disable the warning.
    pub warn_ratio: f64,
    /// Warn when footer payload keys match no field on the same screen.
    pub check_payload_keys: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            warn_ratio: 0.9,
            check_payload_keys: false,
        }
    }
}

/// Settings for the document compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Value of the document's `version` attribute.
    pub flow_version: String,
    /// Value of `data_api_version`, omitted when `None`.
    pub data_api_version: Option<String>,
    /// Emit a `routing_model` derived from navigation targets.
    pub routing_model: bool,
    /// Name of the form group node and of payload references.
    pub form_name: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            flow_version: DEFAULT_FLOW_VERSION.to_string(),
            data_api_version: None,
            routing_model: false,
            form_name: DEFAULT_FORM_NAME.to_string(),
        }
    }
}

impl CompileConfig {
    /// Create a configuration for the given document version.
    #[must_use]
    pub fn new(flow_version: impl Into<String>) -> Self {
        Self {
            flow_version: flow_version.into(),
            ..Self::default()
        }
    }

    /// Enable the routing model.
    #[must_use]
    pub fn with_routing_model(mut self) -> Self {
        self.routing_model = true;
        self
    }

    /// Set the data API version.
    #[must_use]
    pub fn with_data_api_version(mut self, version: impl Into<String>) -> Self {
        self.data_api_version = Some(version.into());
        self
    }
}
