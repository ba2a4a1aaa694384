//! TokenVerifier port - bearer token verification.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Port for verifying bearer tokens into caller identities.
///
/// Keeps the HTTP middleware provider-agnostic: a JWT verifier in
/// production, a fixed-identity mock in tests.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw token and return the caller identity.
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
