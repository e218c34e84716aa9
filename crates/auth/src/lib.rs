//! Authentication for the Soudan API
//!
//! Provides password hashing, bearer token issuance and validation, and an
//! axum extractor that works with any domain state implementing `FromRef<S>`
//! for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod error;
mod extractors;
mod jwt;
mod password;
mod types;

pub use backend::{AuthBackend, IdentityStore, PgIdentityStore};
pub use claims::SessionClaims;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::AuthUser;
pub use password::MAX_PASSWORD_BYTES;
pub use types::AuthIdentity;
