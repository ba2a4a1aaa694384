//! Handlers, grouped by the aggregate they coordinate.

pub mod campaign;
pub mod coupon;
pub mod order;
pub mod usage;
