//! Response bodies shared by HTTP endpoints.

use serde::{Deserialize, Serialize};

use form_engine_core::{Snapshot, Violation};

/// Acknowledgement for delete and cache flush
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    pub message: String,
}

impl Ack {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Error body; `detail` is surfaced to users verbatim
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    /// Present only on rejected submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

/// Body of an accepted submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Always true for accepted submissions
    pub success: bool,
    /// Validated values
    pub data: Snapshot,
}

/// Helper to create error response
pub fn error_response(detail: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        detail: detail.into(),
        violations: None,
    }
}

/// Helper to create a rejected-submission response
pub fn violations_response(detail: impl Into<String>, violations: Vec<Violation>) -> ErrorResponse {
    ErrorResponse {
        detail: detail.into(),
        violations: Some(violations),
    }
}
