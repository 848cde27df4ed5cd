//! Response types for the Attendance & Leave Accounting Engine API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

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
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `401` for requests without a usable identity.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::new("UNAUTHENTICATED", message),
        }
    }

    fn bad_request(code: &str, error: &EngineError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new(code, error.to_string()),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::new("VALIDATION_ERROR", body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new("VALIDATION_ERROR", rejection.body_text()),
        }
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CONFIG_ERROR",
                        "Configuration error",
                        error.to_string(),
                    ),
                }
            }
            EngineError::Store(_) => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORE_ERROR", "Record store failure", error.to_string()),
            },
            EngineError::TaskFailed { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("INTERNAL_ERROR", "Internal error", error.to_string()),
            },
            EngineError::InvalidRange { .. } => Self::bad_request("INVALID_RANGE", &error),
            EngineError::EmptyRange { .. } => Self::bad_request("EMPTY_RANGE", &error),
            EngineError::InsufficientBalance { .. } => {
                Self::bad_request("INSUFFICIENT_BALANCE", &error)
            }
            EngineError::AlreadyOpen { .. } => Self::bad_request("ALREADY_PUNCHED_IN", &error),
            EngineError::NoOpenPunch { .. } => Self::bad_request("NO_OPEN_PUNCH", &error),
            EngineError::InvalidTransition { .. } => {
                Self::bad_request("INVALID_TRANSITION", &error)
            }
            EngineError::Validation { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    error.to_string(),
                    format!("Field '{}' is invalid", field),
                ),
            },
            EngineError::DateConflict { conflicting_id } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "DATE_CONFLICT",
                    error.to_string(),
                    format!("Conflicts with leave request {}", conflicting_id),
                ),
            },
            EngineError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", error.to_string()),
            },
            EngineError::Unauthorized { .. } => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new("FORBIDDEN", error.to_string()),
            },
        }
    }
}
