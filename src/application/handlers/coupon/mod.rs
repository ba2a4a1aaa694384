//! Coupon handlers: redemption, validation dry runs, and admin CRUD.

mod manage_coupons;
mod redeem_coupon;
mod validate_coupon;

pub use manage_coupons::{CouponAdminHandler, CreateCouponCommand, UpdateCouponCommand};
pub use redeem_coupon::{RedeemCouponCommand, RedeemCouponHandler, RedemptionReceipt};
pub use validate_coupon::{CouponValidation, ValidateCouponCommand, ValidateCouponHandler};
