//! Error types for flow operations.
//!
//! Validation findings are never errors; they are returned as
//! [`Diagnostic`](crate::validation::Diagnostic) data. This type covers the
//! fallible edges of the crate: parsing canvas files and importing documents.

use thiserror::Error;

/// Result type for flow operations.
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors that can occur outside the diagnostic channel.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Canvas or document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A document node names a component type this crate does not know.
    #[error("Unknown component type: {0}")]
    UnknownComponent(String),

    /// A document is structurally unusable (missing layout, non-object node, ...).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// An operation would leave the canvas without any screen.
    #[error("Canvas must contain at least one screen")]
    EmptyCanvas,
}
