//! Coupon domain - codes, discount rules, and the coupon aggregate.

mod aggregate;
mod code;
mod discount;
mod errors;
mod events;

pub use aggregate::Coupon;
pub use code::CouponCode;
pub use discount::{Discount, MAX_BASIS_POINTS};
pub use errors::{CouponError, RejectionReason};
pub use events::CouponUsed;
