//! Usage-tracking record.

use serde::{Deserialize, Serialize};

use crate::domain::coupon::CouponCode;
use crate::domain::foundation::{CouponId, Money, OrderId, Timestamp, UsageRecordId, UserId};

/// One row per successful redemption.
///
/// Append-only: never mutated after creation. Serves as the audit trail and
/// as the counter behind the per-user usage cap. The coupon code and the
/// amounts are snapshotted here so history stays meaningful even if the
/// coupon itself is later hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: UsageRecordId,
    pub coupon_id: CouponId,
    pub coupon_code: CouponCode,
    pub user_id: UserId,
    pub order_id: OrderId,
    pub original_amount: Money,
    pub discount_amount: Money,
    pub final_amount: Money,
    pub used_at: Timestamp,
}

impl UsageRecord {
    /// Creates a record for a redemption that just happened.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        coupon_id: CouponId,
        coupon_code: CouponCode,
        user_id: UserId,
        order_id: OrderId,
        original_amount: Money,
        discount_amount: Money,
        final_amount: Money,
        used_at: Timestamp,
    ) -> Self {
        Self {
            id: UsageRecordId::new(),
            coupon_id,
            coupon_code,
            user_id,
            order_id,
            original_amount,
            discount_amount,
            final_amount,
            used_at,
        }
    }
}

/// Aggregate statistics for a coupon's usage history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_usage: u64,
    pub total_discount: Money,
    pub total_revenue: Money,
    pub average_discount: Money,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self {
            total_usage: 0,
            total_discount: Money::ZERO,
            total_revenue: Money::ZERO,
            average_discount: Money::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_snapshots_amounts() {
        let record = UsageRecord::new(
            CouponId::new(),
            CouponCode::try_new("SAVE10").unwrap(),
            UserId::new(),
            OrderId::new(),
            Money::from_cents(5_000).unwrap(),
            Money::from_cents(1_000).unwrap(),
            Money::from_cents(4_000).unwrap(),
            Timestamp::now(),
        );

        assert_eq!(record.original_amount.cents(), 5_000);
        assert_eq!(record.discount_amount.cents(), 1_000);
        assert_eq!(record.final_amount.cents(), 4_000);
    }

    #[test]
    fn default_stats_are_zero() {
        let stats = UsageStats::default();
        assert_eq!(stats.total_usage, 0);
        assert_eq!(stats.total_discount, Money::ZERO);
    }
}
