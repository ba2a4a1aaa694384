//! HS256 JWT adapter for bearer token verification.
//!
//! Validates signature and expiry, then maps the `sub` and `role` claims to
//! the domain `AuthenticatedUser`. Token issuance lives with the identity
//! service; this service only verifies.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::TokenVerifier;

/// Configuration for the JWT verifier.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret.
    pub secret: String,
    /// Extra tolerance on `exp`, in seconds.
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            leeway_secs: 30,
        }
    }
}

/// Claims carried in a service token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject - the user's UUID.
    sub: String,
    /// Caller role ("user" or "admin").
    role: Role,
    /// Expiry timestamp (Unix epoch seconds).
    exp: i64,
}

/// HS256 verifier implementing the TokenVerifier port.
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            },
        )?;

        let user_uuid = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser {
            user_id: UserId::from_uuid(user_uuid),
            role: data.claims.role,
        })
    }
}
