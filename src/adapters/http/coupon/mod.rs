//! Coupon admin endpoints, public browse, and usage queries.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{coupon_routes, usage_routes};
