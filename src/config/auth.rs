//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret for verifying bearer tokens
    pub jwt_secret: String,

    /// Expiry tolerance in seconds
    #[serde(default = "default_leeway")]
    pub token_leeway_secs: u64,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_JWT_SECRET"));
        }
        // Short secrets are tolerated in development only
        if production && self.jwt_secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}

fn default_leeway() -> u64 {
    30
}
