//! Common error types and handling for Soudan

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned to callers for any 5xx error; the detail only goes to the log.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Common error type for the Soudan application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed: {}", .0.join("; "))]
    InvalidFields(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Validation(_) | Error::InvalidFields(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unexpected(_)
            | Error::Database(_)
            | Error::Serialization(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Authentication(_) => "AUTHENTICATION_ERROR",
            Error::Validation(_) | Error::InvalidFields(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Human-readable reasons for a rejected request, if this is a client error.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            Error::Validation(reason) => vec![reason.clone()],
            Error::InvalidFields(reasons) => reasons.clone(),
            _ => Vec::new(),
        }
    }

    /// Message that is safe to show to the caller.
    ///
    /// Server-side failures collapse to a generic message so storage or
    /// provider details never leave the process.
    fn public_message(&self) -> String {
        match self {
            Error::Authentication(msg) | Error::Validation(msg) | Error::NotFound(msg) => {
                msg.clone()
            }
            Error::InvalidFields(_) => "Validation failed".to_string(),
            Error::Unexpected(_)
            | Error::Database(_)
            | Error::Serialization(_)
            | Error::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut reasons: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(|e| match &e.message {
                        Some(message) => format!("{}: {}", field, message),
                        None => format!("{}: {}", field, e.code),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        reasons.sort();
        Error::InvalidFields(reasons)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Log internal errors with full context
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "Internal server error");
        }

        let reasons = self.reasons();
        let mut error = json!({
            "code": error_code,
            "message": self.public_message(),
        });
        if !reasons.is_empty() {
            error["details"] = json!(reasons);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
