//! UsageLog port - append-only redemption audit trail.

use async_trait::async_trait;

use crate::domain::foundation::{CouponId, DomainError, UserId};
use crate::domain::usage::{UsageRecord, UsageStats};

use super::Page;

/// Filter for usage listings.
#[derive(Debug, Clone, Default)]
pub struct UsageFilter {
    pub coupon_id: Option<CouponId>,
    pub user_id: Option<UserId>,
}

/// Port for the redemption audit log.
///
/// Records are append-only; there is deliberately no update or delete.
/// The per-user cap is enforced by counting rows for a {coupon, user} pair,
/// which tolerates staleness because the global cap's atomic reservation is
/// the final arbiter.
#[async_trait]
pub trait UsageLog: Send + Sync {
    /// Append a record for a redemption that just succeeded.
    async fn append(&self, record: &UsageRecord) -> Result<(), DomainError>;

    /// Count prior redemptions of a coupon by a user.
    async fn count_for_user(
        &self,
        coupon_id: &CouponId,
        user_id: &UserId,
    ) -> Result<u32, DomainError>;

    /// List records matching a filter, newest first, with the total count.
    async fn list(
        &self,
        filter: UsageFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, u64), DomainError>;

    /// Aggregate statistics for one coupon.
    async fn stats(&self, coupon_id: &CouponId) -> Result<UsageStats, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_log_is_object_safe() {
        fn _accepts_dyn(_log: &dyn UsageLog) {}
    }
}
