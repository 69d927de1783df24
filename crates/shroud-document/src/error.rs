//! Error types for shroud-document

use thiserror::Error;

use crate::{HyperlinkId, RangeId};

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Not supported by this host: {0}")]
    Unsupported(String),

    #[error("Range not found: {0}")]
    UnknownRange(RangeId),

    #[error("Hyperlink not found: {0}")]
    UnknownHyperlink(HyperlinkId),

    #[error("Section {0} does not exist")]
    NoSuchSection(usize),

    #[error("Host error: {message}")]
    Host {
        message: String,
        diagnostics: Option<serde_json::Value>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocumentError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DocumentError::Unsupported(_))
    }

    /// Structured payload attached by the host, if any
    pub fn diagnostics(&self) -> Option<&serde_json::Value> {
        match self {
            DocumentError::Host { diagnostics, .. } => diagnostics.as_ref(),
            _ => None,
        }
    }
}
