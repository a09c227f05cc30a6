//! Response types for the Leave Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

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

    /// Creates an invalid query-string error response.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// The engine version.
    pub version: String,
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::PrerequisiteMissing => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = status_for(error.kind());
        let message = error.to_string();
        let error = match error {
            EngineError::EmployeeNotFound { .. } => ApiError::new("EMPLOYEE_NOT_FOUND", message),
            EngineError::JoiningDateMissing { .. } => ApiError::with_details(
                "JOINING_DATE_MISSING",
                message,
                "Accrual cannot be computed without a joining date",
            ),
            EngineError::AccrualConfigMissing { .. } => {
                ApiError::new("ACCRUAL_CONFIG_MISSING", message)
            }
            EngineError::InvalidDateRange { .. } => ApiError::with_details(
                "INVALID_DATE_RANGE",
                message,
                "'from' must not be after 'to'",
            ),
            EngineError::InvalidLeaveInterval { .. } => ApiError::with_details(
                "INVALID_LEAVE_INTERVAL",
                message,
                "An approved leave record ends before it starts",
            ),
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidAccrualRule { .. }
            | EngineError::DuplicateAccrualRule { .. } => {
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message)
            }
        };
        ApiErrorResponse { status, error }
    }
}
