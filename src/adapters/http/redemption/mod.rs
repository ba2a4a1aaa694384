//! Redemption endpoints: redeem and validate-only.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::redemption_routes;
