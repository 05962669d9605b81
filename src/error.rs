// src/error.rs
use thiserror::Error;

use crate::core::chat_client::LlmError;

pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Failures that abort a recommendation request.
///
/// Per-field misses never show up here: extractors return `Option` and the
/// entry builders resolve `None` to the sentinel.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Failed to extract text from document: {0}")]
    Extraction(String),

    #[error("Classification failed: {0}")]
    Classification(#[from] LlmError),

    #[error("No listing configured for theme '{0}'")]
    MappingNotFound(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid model reply: {0}")]
    InvalidReply(String),
}

impl AdvisorError {
    pub fn fetch(url: &str, status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            status,
            reason: reason.into(),
        }
    }

    /// Upstream HTTP status carried by a fetch failure, if the server answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}
