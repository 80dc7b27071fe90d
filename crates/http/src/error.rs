//! Error handling for the shelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shelf_db::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Cause chain of a server-side failure.
///
/// Attached to 5xx responses as an extension, never serialized by itself. The
/// router copies it into the body as `detail` only when details are exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail(pub String);

/// Failure envelope shared by every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}: {}", .errors.join("; "))]
    Validation {
        message: String,
        errors: Vec<String>,
    },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Request the extractors refused, with the status they chose
    #[error("rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error from itemized rule violations
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation {
            message: "Validation failed".to_string(),
            errors,
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Rejected { status, .. } => *status,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                error = %self,
                "request failed"
            );
        } else {
            tracing::debug!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                error = %self,
                "request rejected"
            );
        }

        let (body, detail) = match self {
            AppError::Validation { message, errors } => (
                ErrorBody {
                    success: false,
                    message,
                    errors: Some(errors),
                },
                None,
            ),
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message }
            | AppError::Rejected { message, .. } => (
                ErrorBody {
                    success: false,
                    message,
                    errors: None,
                },
                None,
            ),
            AppError::Storage(err) => (
                server_error_body("Failed to persist collection"),
                Some(cause_chain(&err)),
            ),
            AppError::Internal(err) => (
                server_error_body("Internal server error"),
                Some(cause_chain(&*err)),
            ),
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}

fn server_error_body(message: &str) -> ErrorBody {
    ErrorBody {
        success: false,
        message: message.to_string(),
        errors: None,
    }
}

fn cause_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
