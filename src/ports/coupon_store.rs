//! CouponStore port - persistence contract for coupons, including the
//! atomic usage reservation.
//!
//! # Concurrency contract
//!
//! `reserve_usage` is the single point of cross-request coordination in the
//! whole system. Implementations MUST perform the predicate check and the
//! increment as one atomic storage operation; a read-check-write sequence
//! reintroduces the race this port exists to close. Everything else on this
//! trait may serve stale data: pre-checks only reject obviously-ineligible
//! requests early, and the reservation is the final arbiter.

use async_trait::async_trait;

use crate::domain::coupon::{Coupon, CouponCode};
use crate::domain::foundation::{CampaignId, CouponId, DomainError, Timestamp};

use super::Page;

/// Filter for coupon listings.
#[derive(Debug, Clone, Default)]
pub struct CouponFilter {
    pub campaign_id: Option<CampaignId>,
    pub is_active: Option<bool>,
    pub code: Option<CouponCode>,
}

/// Repository port for coupon persistence.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Insert a new coupon.
    ///
    /// # Errors
    ///
    /// - `DuplicateCouponCode` if the code is already taken
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, coupon: &Coupon) -> Result<(), DomainError>;

    /// Update an existing coupon's configuration.
    ///
    /// Does not touch `current_usage`; the counter moves only through
    /// `reserve_usage` and `release_usage`.
    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError>;

    /// Find a coupon by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError>;

    /// Find a coupon by its normalized code. Returns `None` if not found.
    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError>;

    /// List coupons matching a filter, newest first, with the total count.
    async fn list(
        &self,
        filter: CouponFilter,
        page: Page,
    ) -> Result<(Vec<Coupon>, u64), DomainError>;

    /// List coupons that are active, inside their window, and have usage
    /// headroom at `now`.
    async fn list_redeemable(&self, now: Timestamp) -> Result<Vec<Coupon>, DomainError>;

    /// Atomically reserve one usage: increment `current_usage` only if the
    /// cap predicate (`max_usage` is null OR `current_usage < max_usage`)
    /// holds at the moment of the write.
    ///
    /// Returns the post-increment coupon on success, or `None` when the
    /// predicate did not match (cap reached by a concurrent redeemer).
    async fn reserve_usage(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError>;

    /// Compensating decrement for a reservation whose surrounding redemption
    /// failed. Never drives the counter below zero.
    async fn release_usage(&self, id: &CouponId) -> Result<(), DomainError>;

    /// Deactivate every coupon belonging to a campaign. Returns how many
    /// coupons were affected.
    async fn deactivate_for_campaign(&self, campaign_id: &CampaignId) -> Result<u64, DomainError>;

    /// Hard-delete a coupon. Usage records survive because they snapshot
    /// the code and amounts.
    ///
    /// # Errors
    ///
    /// - `CouponNotFound` if the coupon doesn't exist
    async fn delete(&self, id: &CouponId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn CouponStore) {}
    }
}
