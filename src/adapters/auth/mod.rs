//! Authentication adapters.

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtTokenVerifier};
pub use mock::MockTokenVerifier;
