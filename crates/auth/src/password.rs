//! Password hashing capability (bcrypt)
//!
//! bcrypt is CPU-bound, so the async wrappers run it on the blocking pool.

use crate::error::AuthError;

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a plaintext password with the given work factor
pub(crate) async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            AuthError::PasswordHashFailed
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AuthError::PasswordHashFailed
        })
}

/// Check a plaintext password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch.
pub(crate) async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            AuthError::PasswordHashFailed
        })
}
