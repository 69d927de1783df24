//! Error types for shroud-engine

use shroud_core::SensitiveCategory;
use shroud_document::DocumentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RunError>;

/// A hard failure that ended a run.
///
/// Edits applied before the failure stay in the document.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Enabling change tracking failed: {0}")]
    Tracking(#[source] DocumentError),

    #[error("Redacting {category} failed: {source}")]
    Redaction {
        category: SensitiveCategory,
        #[source]
        source: DocumentError,
    },

    #[error("Inserting the confidentiality banner failed: {0}")]
    Header(#[source] DocumentError),
}

impl RunError {
    /// Structured payload attached by the host, if any
    pub fn diagnostics(&self) -> Option<&serde_json::Value> {
        match self {
            RunError::Tracking(source) | RunError::Header(source) => source.diagnostics(),
            RunError::Redaction { source, .. } => source.diagnostics(),
        }
    }
}
