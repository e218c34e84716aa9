//! User profile API handlers
//!
//! - GET /users/profile - Get current user profile
//! - PUT /users/profile - Update username and provider key
//! - PUT /users/password - Change password

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use soudan_auth::{AuthIdentity, AuthUser};
use soudan_common::{Error, Result, ValidatedJson};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::AccountsState;
use crate::domain::entities::{ProfileUpdate, User};
use crate::domain::validation::validate_password;

/// Public view of a user. The provider key itself is never returned.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub has_api_key: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            has_api_key: user.has_api_key(),
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

impl From<AuthIdentity> for UserResponse {
    fn from(identity: AuthIdentity) -> Self {
        Self {
            has_api_key: identity.api_key().is_some(),
            id: identity.id,
            email: identity.email,
            username: identity.username,
            created_at: identity.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Distinguishes an explicit `null` from an absent field
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Request for updating the profile. Absent fields are kept; `null` clears.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "present")]
    pub username: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub api_key: Option<Option<String>>,
}

/// Request for changing the password
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: &'static str,
}

/// GET /users/profile - Get current user profile
pub async fn get_profile(AuthUser(identity): AuthUser) -> Json<UserEnvelope> {
    Json(UserEnvelope {
        user: identity.into(),
    })
}

/// PUT /users/profile - Update user profile
pub async fn update_profile(
    AuthUser(identity): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserEnvelope>> {
    let update = ProfileUpdate::new(request.username, request.api_key)?;

    let updated = state
        .users
        .update_profile(identity.id, &update)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    tracing::info!(
        user_id = %identity.id,
        username_changed = update.username.is_some(),
        api_key_changed = update.gemini_api_key.is_some(),
        "User profile updated"
    );

    Ok(Json(UserEnvelope {
        user: updated.into(),
    }))
}

/// PUT /users/password - Change password after re-checking the current one
pub async fn update_password(
    AuthUser(identity): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<UpdatePasswordRequest>,
) -> Result<Json<SuccessResponse>> {
    let user = state
        .users
        .find_by_id(identity.id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    if !state
        .auth
        .verify_password(&request.current_password, &user.password_hash)
        .await?
    {
        return Err(Error::Validation(
            "現在のパスワードが正しくありません".to_string(),
        ));
    }

    if request.new_password != request.new_password_confirmation {
        return Err(Error::Validation(
            "新しいパスワードと確認用パスワードが一致しません".to_string(),
        ));
    }

    validate_password(&request.new_password)?;

    let password_hash = state.auth.hash_password(&request.new_password).await?;
    if !state
        .users
        .update_password_hash(identity.id, &password_hash)
        .await?
    {
        return Err(Error::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %identity.id, "Password changed");

    Ok(Json(SuccessResponse {
        success: true,
        message: "パスワードが正常に更新されました",
    }))
}
