// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationError;
use crate::store::StoreError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    StoreError(StoreError),
    ValidationError(Vec<String>),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::StoreError(e) => write!(f, "Store Error: {}", e),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation Error: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// JSON error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::StoreError(StoreError::Concurrency { .. }) => StatusCode::CONFLICT,
            ApiError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let (error_message, code, errors) = match self {
            ApiError::BadRequest(msg) => (msg, "BAD_REQUEST", Vec::new()),
            ApiError::NotFound(msg) => (msg, "NOT_FOUND", Vec::new()),
            ApiError::Conflict(msg) => (msg, "CONFLICT", Vec::new()),
            ApiError::StoreError(e @ StoreError::Concurrency { .. }) => {
                (e.to_string(), "CONFLICT", Vec::new())
            }
            ApiError::StoreError(e) => {
                error!(error = %e, "Store error occurred");
                (
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                    Vec::new(),
                )
            }
            ApiError::ValidationError(errors) => (
                "Validation failed".to_string(),
                "VALIDATION_ERROR",
                errors,
            ),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
            errors,
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::ValidationError(err.errors)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::StoreError(err)
    }
}
