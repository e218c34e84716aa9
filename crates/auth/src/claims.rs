//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by a Soudan bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
}
