//! JSON request/response types for the redemption endpoints.
//!
//! Amounts cross this boundary as major units (e.g. dollars); everything
//! behind it is integer cents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::handlers::coupon::{CouponValidation, RedemptionReceipt};

/// Request to redeem a coupon against a purchase.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    /// Coupon code as typed by the user.
    pub code: String,
    /// Purchase amount in major units.
    pub purchase_amount: f64,
    /// Existing pending order to attach to; omitted to create one.
    #[serde(default)]
    pub order_id: Option<Uuid>,
}

/// Successful redemption receipt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub coupon_code: String,
    pub original_amount: f64,
    pub discount_amount: f64,
    pub final_amount: f64,
    pub usage_count: u32,
    pub max_usage: Option<u32>,
    pub order_id: Uuid,
}

impl From<RedemptionReceipt> for RedeemResponse {
    fn from(receipt: RedemptionReceipt) -> Self {
        Self {
            coupon_code: receipt.coupon_code.to_string(),
            original_amount: receipt.original_amount.as_major_units(),
            discount_amount: receipt.discount_amount.as_major_units(),
            final_amount: receipt.final_amount.as_major_units(),
            usage_count: receipt.usage_count,
            max_usage: receipt.max_usage,
            order_id: *receipt.order_id.as_uuid(),
        }
    }
}

/// Request to check a coupon without redeeming it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub code: String,
    pub purchase_amount: f64,
}

/// Result of the validation dry run. Ineligible coupons answer 200 with
/// `valid: false` and the reason; only unknown codes are 404.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<CouponValidation> for ValidateResponse {
    fn from(validation: CouponValidation) -> Self {
        match validation {
            CouponValidation::Eligible {
                coupon_code,
                discount_amount,
                final_amount,
            } => Self {
                valid: true,
                coupon_code: Some(coupon_code.to_string()),
                discount_amount: Some(discount_amount.as_major_units()),
                final_amount: Some(final_amount.as_major_units()),
                reason: None,
                message: None,
            },
            CouponValidation::Ineligible { code, message } => Self {
                valid: false,
                coupon_code: None,
                discount_amount: None,
                final_amount: None,
                reason: Some(code.to_string()),
                message: Some(message),
            },
        }
    }
}
