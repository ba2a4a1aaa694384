//! Domain layer - pure business types and rules, no I/O.

pub mod campaign;
pub mod coupon;
pub mod foundation;
pub mod order;
pub mod usage;
