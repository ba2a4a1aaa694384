//! Coupon aggregate.
//!
//! Carries the discount configuration, the temporal window, and the usage
//! counters. Eligibility evaluation and discount computation are pure; the
//! counter itself is only ever moved by the store's atomic reservation, so
//! an in-memory `Coupon` value is a snapshot, not the authority.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CampaignId, CouponId, Money, Timestamp, UserId, ValidationError,
};

use super::{CouponCode, Discount, RejectionReason};

/// A redeemable discount code with eligibility rules and usage caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: CouponCode,
    pub description: Option<String>,
    pub discount: Discount,
    /// Purchase floor; zero means no minimum.
    pub min_purchase: Money,
    pub start_at: Timestamp,
    pub expires_at: Timestamp,
    /// Global usage ceiling; `None` means unlimited.
    pub max_usage: Option<u32>,
    /// Successful redemptions so far. Monotonically non-decreasing except
    /// for compensating decrements after a failed order materialization.
    pub current_usage: u32,
    /// Per-user redemption cap.
    pub user_max_usage: u32,
    /// Manual kill switch, independent of the date window.
    pub is_active: bool,
    pub campaign_id: CampaignId,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Coupon {
    /// Creates a new coupon, enforcing write-time invariants.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `start_at` is not before `expires_at`
    /// - `max_usage` is `Some(0)`
    /// - `user_max_usage` is zero
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CouponId,
        code: CouponCode,
        description: Option<String>,
        discount: Discount,
        min_purchase: Money,
        start_at: Timestamp,
        expires_at: Timestamp,
        max_usage: Option<u32>,
        user_max_usage: u32,
        campaign_id: CampaignId,
        created_by: UserId,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Self::validate_window(start_at, expires_at)?;
        if max_usage == Some(0) {
            return Err(ValidationError::out_of_range("max_usage", 1, i64::MAX, 0));
        }
        if user_max_usage == 0 {
            return Err(ValidationError::out_of_range("user_max_usage", 1, i64::MAX, 0));
        }

        Ok(Self {
            id,
            code,
            description,
            discount,
            min_purchase,
            start_at,
            expires_at,
            max_usage,
            current_usage: 0,
            user_max_usage,
            is_active: true,
            campaign_id,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Checks the date-window invariant shared by create and update.
    pub fn validate_window(start_at: Timestamp, expires_at: Timestamp) -> Result<(), ValidationError> {
        if !start_at.is_before(&expires_at) {
            return Err(ValidationError::invalid_format(
                "expires_at",
                "expiry date must be after start date",
            ));
        }
        Ok(())
    }

    /// Evaluates eligibility for a purchase at a point in time.
    ///
    /// Checks run in a fixed order and short-circuit on the first failure,
    /// so error messages are deterministic:
    /// active → started → not expired → global cap → minimum purchase.
    ///
    /// This is advisory under concurrency: the cap check here reads a
    /// possibly stale counter. The store's conditional increment is the
    /// authority; this pre-check only rejects clearly-ineligible requests
    /// early.
    pub fn evaluate_eligibility(
        &self,
        purchase: Money,
        now: Timestamp,
    ) -> Result<(), RejectionReason> {
        if !self.is_active {
            return Err(RejectionReason::Inactive);
        }
        if now.is_before(&self.start_at) {
            return Err(RejectionReason::NotStarted);
        }
        if now.is_after(&self.expires_at) {
            return Err(RejectionReason::Expired);
        }
        if let Some(max) = self.max_usage {
            if self.current_usage >= max {
                return Err(RejectionReason::UsageLimitReached);
            }
        }
        if purchase < self.min_purchase {
            return Err(RejectionReason::BelowMinimum {
                minimum: self.min_purchase,
            });
        }
        Ok(())
    }

    /// Computes the discount for a purchase amount.
    ///
    /// Pure delegation to the discount configuration; result is always
    /// within `[0, purchase]`.
    pub fn compute_discount(&self, purchase: Money) -> Money {
        self.discount.compute(purchase)
    }

    /// Returns true if the global cap still has headroom.
    pub fn has_usage_headroom(&self) -> bool {
        match self.max_usage {
            Some(max) => self.current_usage < max,
            None => true,
        }
    }

    /// Switches the coupon on.
    pub fn activate(&mut self, now: Timestamp) {
        self.is_active = true;
        self.updated_at = now;
    }

    /// Switches the coupon off. Soft-deletion preferred over removal so
    /// usage history keeps a live referent.
    pub fn deactivate(&mut self, now: Timestamp) {
        self.is_active = false;
        self.updated_at = now;
    }
}
