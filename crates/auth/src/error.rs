//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingAuthorization,
    #[error("Invalid authorization header format")]
    InvalidAuthorizationFormat,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid user ID in token")]
    InvalidUserId,
    #[error("User not found")]
    UserNotFound,
    #[error("Failed to load user")]
    UserLoadError,
    #[error("Failed to issue token")]
    TokenIssueFailed,
    #[error("Password hashing failed")]
    PasswordHashFailed,
}

impl AuthError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::MissingAuthorization => {
                (StatusCode::UNAUTHORIZED, "MISSING_AUTHORIZATION")
            }
            AuthError::InvalidAuthorizationFormat => {
                (StatusCode::UNAUTHORIZED, "INVALID_AUTHORIZATION")
            }
            AuthError::InvalidToken | AuthError::InvalidUserId => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
            }
            AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND"),
            AuthError::UserLoadError => (StatusCode::INTERNAL_SERVER_ERROR, "USER_LOAD_ERROR"),
            AuthError::TokenIssueFailed | AuthError::PasswordHashFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for soudan_common::Error {
    fn from(err: AuthError) -> Self {
        match err.parts().0 {
            StatusCode::UNAUTHORIZED => soudan_common::Error::Authentication(err.to_string()),
            _ => soudan_common::Error::Internal(err.to_string()),
        }
    }
}
