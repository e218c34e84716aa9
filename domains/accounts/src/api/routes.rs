//! Route definitions for Accounts domain API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{auth, users};
use super::middleware::AccountsState;

/// Create registration and session routes
fn auth_routes() -> Router<AccountsState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", delete(auth::logout))
}

/// Create user profile routes
fn user_routes() -> Router<AccountsState> {
    Router::new()
        .route(
            "/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/users/password", put(users::update_password))
}

/// Create all Accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new().merge(auth_routes()).merge(user_routes())
}
