//! JWT claims types

use serde::{Deserialize, Serialize};

/// Session claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    #[serde(default)]
    pub email: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    #[serde(default)]
    pub aud: Option<String>,
    /// Issuer
    #[serde(default)]
    pub iss: Option<String>,
}
