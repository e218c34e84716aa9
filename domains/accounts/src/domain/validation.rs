//! Field validation for account data

use soudan_auth::MAX_PASSWORD_BYTES;
use soudan_common::{Error, Result};
use validator::ValidateEmail;

/// Maximum username length (varchar(100))
pub const MAX_USERNAME_LENGTH: usize = 100;

/// Trim and lower-case an email address, rejecting malformed ones
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(Error::Validation("Email is required".to_string()));
    }
    if !email.validate_email() {
        return Err(Error::Validation("Email is invalid".to_string()));
    }
    Ok(email)
}

/// Passwords must be non-empty and fit bcrypt's input limit
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::Validation("Password is required".to_string()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(Error::Validation(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// Trim a username; blank means unset
pub fn normalize_username(raw: Option<String>) -> Result<Option<String>> {
    let Some(username) = raw.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(Error::Validation(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    Ok(Some(username))
}

/// Trim a provider key; blank means unset
pub fn normalize_api_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
