//! Client error taxonomy.

use thiserror::Error;

use form_engine_core::{ConfigKey, EngineError, ValidationFailure};

/// Typed outcome of a failed store operation. None of these are fatal.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No configuration exists for the key
    #[error("Config for '{key}' not found")]
    NotFound { key: ConfigKey },

    /// Create on a key that already has a configuration
    #[error("Config for '{key}' already exists: {detail}")]
    Conflict { key: ConfigKey, detail: String },

    /// Rejected locally before any request was sent
    #[error(transparent)]
    Malformed(#[from] EngineError),

    /// Submission rejected by the backend's validation
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Network or backend failure; `detail` is the backend's text verbatim when it sent one
    #[error("Transport failure: {detail}")]
    Transport {
        status: Option<u16>,
        detail: String,
    },
}

impl ClientError {
    pub(crate) fn transport(detail: impl Into<String>) -> Self {
        ClientError::Transport {
            status: None,
            detail: detail.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }
}
