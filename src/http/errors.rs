//! # User API Errors
//!
//! Error types for the HTTP surface. Every failure path ends up here and
//! is rendered as the uniform `{success:false, error, message}` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Result type for user API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// User API errors, one variant per failure class in the response contract
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Missing/empty field or malformed request body; detected before
    /// any storage access
    #[error("{0}")]
    Validation(String),

    /// No row matched the requested id
    #[error("User with id {0} not found")]
    NotFound(i64),

    /// The email is already owned by another row
    #[error("A user with email '{0}' already exists")]
    EmailConflict(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Opaque storage failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EmailConflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short error label for the failure envelope
    pub fn label(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation failed",
            ApiError::NotFound(_) => "User not found",
            ApiError::EmailConflict(_) => "Email already exists",
            ApiError::Internal(_) => "Database error",
        }
    }
}

/// Failure envelope returned by every error path
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        Self {
            success: false,
            error: err.label().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(message) => warn!("request failed: {}", message),
            other => debug!("request rejected: {}", other),
        }

        let status = self.status_code();
        let body = ErrorBody::from(&self);
        (status, Json(body)).into_response()
    }
}
