//! Registration and session API handlers
//!
//! Tokens are stateless, so logout only acknowledges the request.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use soudan_common::{Error, Result, ValidatedJson};
use validator::Validate;

use super::users::{SuccessResponse, UserResponse};
use crate::api::middleware::AccountsState;
use crate::domain::entities::NewUser;
use crate::domain::validation::{normalize_email, validate_password};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Request for registering a user
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub username: Option<String>,

    pub api_key: Option<String>,
}

/// Request for logging in
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response carrying a bearer token
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

/// POST /auth/register - Create an account and issue a token
pub async fn register(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let new_user = NewUser::new(&request.email, request.username, request.api_key)?;
    validate_password(&request.password)?;

    if state.users.find_by_email(&new_user.email).await?.is_some() {
        return Err(Error::Validation("Email already exists".to_string()));
    }

    let password_hash = state.auth.hash_password(&request.password).await?;
    let user = state
        .users
        .create(&new_user.into_user(password_hash))
        .await?;
    let token = state.auth.issue_token(user.id)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// POST /auth/login - Exchange credentials for a token
pub async fn login(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let invalid = || Error::Authentication(INVALID_CREDENTIALS.to_string());

    let email = normalize_email(&request.email).map_err(|_| invalid())?;
    let Some(user) = state.users.find_by_email(&email).await? else {
        tracing::info!("Login failed: unknown email");
        return Err(invalid());
    };

    if !state
        .auth
        .verify_password(&request.password, &user.password_hash)
        .await?
    {
        tracing::info!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    let token = state.auth.issue_token(user.id)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(SessionResponse {
        user: user.into(),
        token,
    }))
}

/// DELETE /auth/logout - Acknowledge logout; the client discards its token
pub async fn logout() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        success: true,
        message: "Logged out successfully",
    })
}
