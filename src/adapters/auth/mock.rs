//! Mock token verifier for testing.
//!
//! Maps fixed token strings to identities so HTTP tests never need a real
//! signing key.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::TokenVerifier;

/// Mock verifier: tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenVerifier {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl MockTokenVerifier {
    /// Creates a new empty mock verifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token that maps to the given identity.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens
            .write()
            .expect("MockTokenVerifier: lock poisoned")
            .insert(token.into(), user);
        self
    }

    /// Adds a token for a fresh regular user and returns its id.
    pub fn with_regular_user(self, token: impl Into<String>) -> (Self, UserId) {
        let user_id = UserId::new();
        let this = self.with_user(
            token,
            AuthenticatedUser {
                user_id,
                role: Role::User,
            },
        );
        (this, user_id)
    }

    /// Adds a token for a fresh admin and returns its id.
    pub fn with_admin(self, token: impl Into<String>) -> (Self, UserId) {
        let user_id = UserId::new();
        let this = self.with_user(
            token,
            AuthenticatedUser {
                user_id,
                role: Role::Admin,
            },
        );
        (this, user_id)
    }
}

#[async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.tokens
            .read()
            .expect("MockTokenVerifier: lock poisoned")
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_resolves() {
        let (verifier, user_id) = MockTokenVerifier::new().with_regular_user("alice-token");
        let user = verifier.verify("alice-token").await.unwrap();
        assert_eq!(user.user_id, user_id);
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let verifier = MockTokenVerifier::new();
        assert_eq!(
            verifier.verify("nope").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
