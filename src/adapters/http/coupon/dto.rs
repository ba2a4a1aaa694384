//! JSON request/response types for coupon and usage endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::coupon::{Coupon, Discount};
use crate::domain::foundation::{Money, ValidationError};
use crate::domain::usage::{UsageRecord, UsageStats};

use super::super::PageMeta;

/// Deserializes a field that distinguishes "absent" from "present but null".
/// Used for clearing an optional column through a PUT.
fn some_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ════════════════════════════════════════════════════════════════════════════════
// Discount wire form
// ════════════════════════════════════════════════════════════════════════════════

/// Discount as it appears on the wire: a type tag plus major-unit values.
/// Percentages are whole percent (10.5 = 10.5%), converted to basis points
/// internally.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountDto {
    pub discount_type: String,
    pub discount_value: f64,
    #[serde(default)]
    pub discount_cap: Option<f64>,
}

impl DiscountDto {
    pub fn to_domain(&self) -> Result<Discount, ValidationError> {
        match self.discount_type.as_str() {
            "percentage" => {
                if !self.discount_value.is_finite() || self.discount_value < 0.0 {
                    return Err(ValidationError::invalid_format(
                        "discountValue",
                        "Percentage must be a non-negative number",
                    ));
                }
                let basis_points = (self.discount_value * 100.0).round() as u32;
                let cap = self
                    .discount_cap
                    .map(Money::from_major_units)
                    .transpose()?;
                Discount::percentage(basis_points, cap)
            }
            "fixed" => Ok(Discount::fixed(Money::from_major_units(
                self.discount_value,
            )?)),
            other => Err(ValidationError::invalid_format(
                "discountType",
                format!("Unknown discount type '{}'", other),
            )),
        }
    }
}

fn discount_to_wire(discount: &Discount) -> (String, f64, Option<f64>) {
    match discount {
        Discount::Percentage { basis_points, cap } => (
            "percentage".to_string(),
            *basis_points as f64 / 100.0,
            cap.map(|c| c.as_major_units()),
        ),
        Discount::Fixed { amount } => ("fixed".to_string(), amount.as_major_units(), None),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a coupon.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub discount: DiscountDto,
    pub min_purchase: f64,
    pub start_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub max_usage: Option<u32>,
    #[serde(default = "default_user_max_usage")]
    pub user_max_usage: u32,
    pub campaign_id: Uuid,
}

fn default_user_max_usage() -> u32 {
    1
}

/// Request to update a coupon. Absent fields are left unchanged;
/// `maxUsage: null` clears the cap.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCouponRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    pub discount_value: Option<f64>,
    #[serde(default)]
    pub discount_cap: Option<f64>,
    #[serde(default)]
    pub min_purchase: Option<f64>,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "some_option")]
    pub max_usage: Option<Option<u32>>,
    #[serde(default)]
    pub user_max_usage: Option<u32>,
}

impl UpdateCouponRequest {
    /// Builds the discount change, if the request carries one.
    pub fn discount(&self) -> Result<Option<Discount>, ValidationError> {
        match &self.discount_type {
            None => Ok(None),
            Some(discount_type) => {
                let value = self.discount_value.ok_or_else(|| {
                    ValidationError::invalid_format(
                        "discountValue",
                        "discountValue is required when discountType is set",
                    )
                })?;
                let dto = DiscountDto {
                    discount_type: discount_type.clone(),
                    discount_value: value,
                    discount_cap: self.discount_cap,
                };
                dto.to_domain().map(Some)
            }
        }
    }
}

/// Filters for the coupon listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponListQuery {
    #[serde(default)]
    pub campaign_id: Option<Uuid>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Filters for the usage listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageListQuery {
    #[serde(default)]
    pub coupon_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Coupon view for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: String,
    pub discount_value: f64,
    pub discount_cap: Option<f64>,
    pub min_purchase: f64,
    pub start_at: String,
    pub expires_at: String,
    pub max_usage: Option<u32>,
    pub current_usage: u32,
    pub user_max_usage: u32,
    pub is_active: bool,
    pub campaign_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        let (discount_type, discount_value, discount_cap) = discount_to_wire(&coupon.discount);
        Self {
            id: *coupon.id.as_uuid(),
            code: coupon.code.to_string(),
            description: coupon.description,
            discount_type,
            discount_value,
            discount_cap,
            min_purchase: coupon.min_purchase.as_major_units(),
            start_at: coupon.start_at.as_datetime().to_rfc3339(),
            expires_at: coupon.expires_at.as_datetime().to_rfc3339(),
            max_usage: coupon.max_usage,
            current_usage: coupon.current_usage,
            user_max_usage: coupon.user_max_usage,
            is_active: coupon.is_active,
            campaign_id: *coupon.campaign_id.as_uuid(),
            created_at: coupon.created_at.as_datetime().to_rfc3339(),
            updated_at: coupon.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Paginated coupon listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponListResponse {
    pub coupons: Vec<CouponResponse>,
    pub pagination: PageMeta,
}

/// One row of the redemption audit trail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecordResponse {
    pub id: Uuid,
    pub coupon_id: Uuid,
    pub coupon_code: String,
    pub user_id: Uuid,
    pub order_id: Uuid,
    pub original_amount: f64,
    pub discount_amount: f64,
    pub final_amount: f64,
    pub used_at: String,
}

impl From<UsageRecord> for UsageRecordResponse {
    fn from(record: UsageRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            coupon_id: *record.coupon_id.as_uuid(),
            coupon_code: record.coupon_code.to_string(),
            user_id: *record.user_id.as_uuid(),
            order_id: *record.order_id.as_uuid(),
            original_amount: record.original_amount.as_major_units(),
            discount_amount: record.discount_amount.as_major_units(),
            final_amount: record.final_amount.as_major_units(),
            used_at: record.used_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Paginated usage listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageListResponse {
    pub records: Vec<UsageRecordResponse>,
    pub pagination: PageMeta,
}

/// Aggregate usage statistics for one coupon.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatsResponse {
    pub total_usage: u64,
    pub total_discount: f64,
    pub total_revenue: f64,
    pub average_discount: f64,
}

impl From<UsageStats> for UsageStatsResponse {
    fn from(stats: UsageStats) -> Self {
        Self {
            total_usage: stats.total_usage,
            total_discount: stats.total_discount.as_major_units(),
            total_revenue: stats.total_revenue.as_major_units(),
            average_discount: stats.average_discount.as_major_units(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_deserializes_percentage_coupon() {
        let json = r#"{
            "code": "SPRING25",
            "discountType": "percentage",
            "discountValue": 25.0,
            "discountCap": 50.0,
            "minPurchase": 10.0,
            "startAt": "2026-01-01T00:00:00Z",
            "expiresAt": "2026-12-31T00:00:00Z",
            "campaignId": "7f3b8a1e-4f6d-4f1a-9c2b-0d5e6f7a8b9c"
        }"#;
        let request: CreateCouponRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.code, "SPRING25");
        assert_eq!(request.user_max_usage, 1);

        let discount = request.discount.to_domain().unwrap();
        match discount {
            Discount::Percentage { basis_points, cap } => {
                assert_eq!(basis_points, 2500);
                assert_eq!(cap.unwrap().cents(), 5000);
            }
            _ => panic!("expected percentage discount"),
        }
    }

    #[test]
    fn discount_dto_rejects_unknown_type() {
        let dto = DiscountDto {
            discount_type: "bogo".to_string(),
            discount_value: 1.0,
            discount_cap: None,
        };
        assert!(dto.to_domain().is_err());
    }

    #[test]
    fn update_request_distinguishes_absent_from_null_cap() {
        let absent: UpdateCouponRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.max_usage.is_none());

        let cleared: UpdateCouponRequest =
            serde_json::from_str(r#"{"maxUsage": null}"#).unwrap();
        assert_eq!(cleared.max_usage, Some(None));

        let set: UpdateCouponRequest = serde_json::from_str(r#"{"maxUsage": 5}"#).unwrap();
        assert_eq!(set.max_usage, Some(Some(5)));
    }

    #[test]
    fn update_request_requires_value_with_type() {
        let request: UpdateCouponRequest =
            serde_json::from_str(r#"{"discountType": "fixed"}"#).unwrap();
        assert!(request.discount().is_err());
    }
}
