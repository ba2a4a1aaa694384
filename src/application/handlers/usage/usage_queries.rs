//! UsageQueryHandler - read-side queries over the redemption audit trail.

use std::sync::Arc;

use crate::domain::coupon::CouponError;
use crate::domain::foundation::{AuthenticatedUser, CouponId};
use crate::domain::usage::{UsageRecord, UsageStats};
use crate::ports::{CouponStore, Page, UsageFilter, UsageLog};

/// Handler for usage history and statistics.
pub struct UsageQueryHandler {
    usage: Arc<dyn UsageLog>,
    coupons: Arc<dyn CouponStore>,
}

impl UsageQueryHandler {
    pub fn new(usage: Arc<dyn UsageLog>, coupons: Arc<dyn CouponStore>) -> Self {
        Self { usage, coupons }
    }

    /// Lists usage records. Non-admin callers are pinned to their own
    /// history regardless of the requested filter.
    pub async fn list(
        &self,
        caller: &AuthenticatedUser,
        mut filter: UsageFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, u64), CouponError> {
        if !caller.role.is_admin() {
            filter.user_id = Some(caller.user_id);
        }
        Ok(self.usage.list(filter, page).await?)
    }

    /// Aggregate statistics for one coupon. The coupon must still exist;
    /// stats for hard-deleted coupons are reachable only through `list`.
    pub async fn stats(&self, coupon_id: &CouponId) -> Result<UsageStats, CouponError> {
        self.coupons
            .find_by_id(coupon_id)
            .await?
            .ok_or(CouponError::NotFound)?;
        Ok(self.usage.stats(coupon_id).await?)
    }
}
