//! ValidateCouponHandler - dry-run eligibility check with a discount preview.
//!
//! Performs the same checks the redemption path runs before its reservation,
//! without writing anything. The answer is advisory: a coupon reported
//! eligible here can still lose the last usage slot to a concurrent
//! redemption.

use std::sync::Arc;

use crate::domain::coupon::{CouponCode, CouponError};
use crate::domain::foundation::{Money, Timestamp, UserId};
use crate::ports::{CouponStore, UsageLog};

/// Command to check a coupon against a purchase without redeeming it.
#[derive(Debug, Clone)]
pub struct ValidateCouponCommand {
    pub user_id: UserId,
    pub code: String,
    pub purchase_amount: Money,
}

/// Outcome of a validation dry run.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponValidation {
    /// The coupon would apply; amounts show what redemption would produce.
    Eligible {
        coupon_code: CouponCode,
        discount_amount: Money,
        final_amount: Money,
    },
    /// The coupon exists but one of the rules fails.
    Ineligible {
        /// Stable machine-readable reason code.
        code: &'static str,
        message: String,
    },
}

/// Handler for the validation dry run.
pub struct ValidateCouponHandler {
    coupons: Arc<dyn CouponStore>,
    usage: Arc<dyn UsageLog>,
}

impl ValidateCouponHandler {
    pub fn new(coupons: Arc<dyn CouponStore>, usage: Arc<dyn UsageLog>) -> Self {
        Self { coupons, usage }
    }

    pub async fn handle(
        &self,
        cmd: ValidateCouponCommand,
    ) -> Result<CouponValidation, CouponError> {
        let now = Timestamp::now();

        // 1. Lookup, same normalization as redemption
        let code = CouponCode::try_new(&cmd.code).map_err(|_| CouponError::NotFound)?;
        let coupon = self
            .coupons
            .find_by_code(&code)
            .await?
            .ok_or(CouponError::NotFound)?;

        // 2. Eligibility rules, reported instead of raised
        if let Err(reason) = coupon.evaluate_eligibility(cmd.purchase_amount, now) {
            return Ok(CouponValidation::Ineligible {
                code: reason.code(),
                message: reason.to_string(),
            });
        }

        // 3. Per-user cap
        let prior_uses = self
            .usage
            .count_for_user(&coupon.id, &cmd.user_id)
            .await?;
        if prior_uses >= coupon.user_max_usage {
            return Ok(CouponValidation::Ineligible {
                code: "USER_LIMIT_REACHED",
                message: CouponError::UserLimitReached.to_string(),
            });
        }

        // 4. Discount preview
        let discount = coupon.compute_discount(cmd.purchase_amount);
        Ok(CouponValidation::Eligible {
            coupon_code: coupon.code,
            discount_amount: discount,
            final_amount: cmd.purchase_amount.saturating_sub(discount),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCouponStore, InMemoryUsageLog};
    use crate::domain::coupon::{Coupon, Discount};
    use crate::domain::foundation::{CampaignId, CouponId, OrderId};
    use crate::domain::usage::UsageRecord;

    fn money(cents: i64) -> Money {
        Money::from_cents(cents).unwrap()
    }

    fn save10() -> Coupon {
        let now = Timestamp::now();
        Coupon::new(
            CouponId::new(),
            CouponCode::try_new("SAVE10").unwrap(),
            None,
            Discount::fixed(money(1_000)),
            money(2_000),
            now.minus_days(1),
            now.add_days(30),
            Some(5),
            1,
            CampaignId::new(),
            UserId::new(),
            now,
        )
        .unwrap()
    }

    fn handler_with(
        coupon: Coupon,
        usage: Arc<InMemoryUsageLog>,
    ) -> ValidateCouponHandler {
        let coupons = Arc::new(InMemoryCouponStore::with_coupons([coupon]));
        ValidateCouponHandler::new(coupons, usage)
    }

    #[tokio::test]
    async fn eligible_coupon_returns_preview() {
        let handler = handler_with(save10(), Arc::new(InMemoryUsageLog::new()));

        let outcome = handler
            .handle(ValidateCouponCommand {
                user_id: UserId::new(),
                code: "SAVE10".to_string(),
                purchase_amount: money(5_000),
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CouponValidation::Eligible {
                coupon_code: CouponCode::try_new("SAVE10").unwrap(),
                discount_amount: money(1_000),
                final_amount: money(4_000),
            }
        );
    }

    #[tokio::test]
    async fn validation_writes_nothing() {
        let usage = Arc::new(InMemoryUsageLog::new());
        let coupon = save10();
        let coupons = Arc::new(InMemoryCouponStore::with_coupons([coupon.clone()]));
        let handler = ValidateCouponHandler::new(coupons.clone(), usage.clone());

        handler
            .handle(ValidateCouponCommand {
                user_id: UserId::new(),
                code: "SAVE10".to_string(),
                purchase_amount: money(5_000),
            })
            .await
            .unwrap();

        assert_eq!(coupons.current_usage(&coupon.id), Some(0));
        assert_eq!(usage.record_count(), 0);
    }

    #[tokio::test]
    async fn below_minimum_is_reported_not_raised() {
        let handler = handler_with(save10(), Arc::new(InMemoryUsageLog::new()));

        let outcome = handler
            .handle(ValidateCouponCommand {
                user_id: UserId::new(),
                code: "SAVE10".to_string(),
                purchase_amount: money(500),
            })
            .await
            .unwrap();

        match outcome {
            CouponValidation::Ineligible { code, message } => {
                assert_eq!(code, "BELOW_MINIMUM");
                assert!(message.contains("20.00"));
            }
            other => panic!("expected ineligible, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn per_user_cap_is_reported() {
        let coupon = save10();
        let user_id = UserId::new();
        let usage = Arc::new(InMemoryUsageLog::with_records([UsageRecord::new(
            coupon.id,
            coupon.code.clone(),
            user_id,
            OrderId::new(),
            money(5_000),
            money(1_000),
            money(4_000),
            Timestamp::now(),
        )]));
        let handler = handler_with(coupon, usage);

        let outcome = handler
            .handle(ValidateCouponCommand {
                user_id,
                code: "SAVE10".to_string(),
                purchase_amount: money(5_000),
            })
            .await
            .unwrap();

        match outcome {
            CouponValidation::Ineligible { code, .. } => {
                assert_eq!(code, "USER_LIMIT_REACHED");
            }
            other => panic!("expected ineligible, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let handler = handler_with(save10(), Arc::new(InMemoryUsageLog::new()));

        let result = handler
            .handle(ValidateCouponCommand {
                user_id: UserId::new(),
                code: "MISSING1".to_string(),
                purchase_amount: money(5_000),
            })
            .await;
        assert!(matches!(result, Err(CouponError::NotFound)));
    }
}
