//! Application error handling
//!
//! This module provides unified error handling for the API, converting
//! internal errors to the wire error shape:
//! `{status: false, error: <kind>, message, details?}`. `details` is only
//! present on validation failures.

use crate::identity::IdentityError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gym_manager_shared::{ValidationIssue, ValidationIssues};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request payload")]
    Validation(#[from] ValidationIssues),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Authentication(String),

    #[error("Failed to {context}")]
    Internal {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    /// Wrap an internal failure with the operation it interrupted; the
    /// context doubles as the fallback response message.
    pub fn internal(context: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Internal {
            context: context.into(),
            source,
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected { message, .. } => ApiError::Authentication(message),
            IdentityError::Other(source) => ApiError::internal("add user", source),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorBody {
    pub status: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationIssue>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message, details) = match self {
            ApiError::Validation(issues) => {
                warn!(issues = issues.issues.len(), "request payload rejected");
                (
                    StatusCode::BAD_REQUEST,
                    "ValidationError",
                    "Invalid request payload".to_string(),
                    Some(issues.issues),
                )
            }
            ApiError::BadRequest(msg) => {
                warn!(error = %msg, "bad request");
                (StatusCode::BAD_REQUEST, "BadRequest", msg, None)
            }
            ApiError::NotFound(msg) => {
                warn!(error = %msg, "not found");
                (StatusCode::NOT_FOUND, "NotFound", msg, None)
            }
            ApiError::Authentication(msg) => {
                warn!(error = %msg, "identity provider rejected request");
                (StatusCode::BAD_REQUEST, "AuthenticationError", msg, None)
            }
            ApiError::Internal { context, source } => {
                error!(context = %context, error = ?source, "internal error");
                let message = match source.to_string() {
                    m if m.is_empty() => format!("Failed to {context}"),
                    m => m,
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    message,
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            status: false,
            error: kind.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
