//! Response types for the rank engine API.
//!
//! Per-employee failures travel inside `RankOutcome`s with a 200 status.
//! The types here cover failures of the request itself.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ErrorKind};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let kind = error.kind();
        let (status, details) = match kind {
            ErrorKind::DateInvalid
            | ErrorKind::CareerDataInvalid
            | ErrorKind::AssignmentDataInvalid
            | ErrorKind::RankCalculationError
            | ErrorKind::InvalidEmployee => (
                StatusCode::BAD_REQUEST,
                "The request contains invalid data",
            ),
            ErrorKind::ConfigError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The engine configuration could not be loaded",
            ),
            ErrorKind::RemoteUnavailable => (
                StatusCode::BAD_GATEWAY,
                "The calculation service could not be reached",
            ),
            ErrorKind::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "The calculation service rejected the credentials",
            ),
        };

        ApiErrorResponse {
            status,
            error: ApiError::with_details(kind.as_str(), error.to_string(), details),
        }
    }
}
