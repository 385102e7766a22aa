//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Minimum accepted password length.
    #[serde(default = "default_password_min_length")]
    pub password_min_length: u32,
}

fn default_access_ttl() -> u64 {
    60
}

fn default_password_min_length() -> u32 {
    8
}
