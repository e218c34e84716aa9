//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`, so each
//! domain router can carry its own state type.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;
use crate::types::AuthIdentity;

/// The caller behind a valid bearer token, loaded fresh from the store
#[derive(Debug)]
pub struct AuthUser(pub AuthIdentity);

fn bearer_token(parts: &Parts) -> Result<String, AuthError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)
        .and_then(extract_bearer_token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        match AuthBackend::from_ref(state).authenticate_jwt(&token).await {
            Ok(identity) => Ok(AuthUser(identity)),
            Err(err) => {
                tracing::debug!(path = %parts.uri.path(), error = %err, "Bearer authentication rejected");
                Err(err)
            }
        }
    }
}
