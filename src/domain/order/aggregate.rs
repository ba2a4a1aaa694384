//! Order aggregate and status state machine.

use serde::{Deserialize, Serialize};

use crate::domain::coupon::{CouponCode, CouponError};
use crate::domain::foundation::{CouponId, Money, OrderId, Timestamp, UserId};

/// Order lifecycle status.
///
/// Transitions: `Pending → Accepted | Rejected | Cancelled`, and
/// `Accepted → Completed`. Coupon application does not change the status;
/// it is only allowed while the order is `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the transition to `next` is allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (
                OrderStatus::Pending,
                OrderStatus::Accepted | OrderStatus::Rejected | OrderStatus::Cancelled
            ) | (OrderStatus::Accepted, OrderStatus::Completed)
        )
    }

    /// Stable string form used in storage and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's order, the target a coupon redemption materializes into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Amount at creation time; never mutated afterwards.
    pub total: Money,
    /// Zero until a coupon is applied.
    pub discount: Money,
    /// Always `total - discount`.
    pub final_amount: Money,
    pub status: OrderStatus,
    pub coupon_code: Option<CouponCode>,
    pub coupon_id: Option<CouponId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Creates a fresh pending order with no discount.
    pub fn create(id: OrderId, user_id: UserId, total: Money, now: Timestamp) -> Self {
        Self {
            id,
            user_id,
            total,
            discount: Money::ZERO,
            final_amount: total,
            status: OrderStatus::Pending,
            coupon_code: None,
            coupon_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a coupon's discount to this order.
    ///
    /// Only allowed while the order is pending and has no coupon yet; the
    /// discount/final fields move exactly once in the normal flow.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotPending` if the order left the pending state or
    /// already carries a coupon.
    pub fn apply_coupon(
        &mut self,
        coupon_id: CouponId,
        code: CouponCode,
        discount: Money,
        now: Timestamp,
    ) -> Result<(), CouponError> {
        if self.status != OrderStatus::Pending || self.coupon_code.is_some() {
            return Err(CouponError::OrderNotPending);
        }

        self.coupon_id = Some(coupon_id);
        self.coupon_code = Some(code);
        self.discount = discount.min(self.total);
        self.final_amount = self.total.saturating_sub(self.discount);
        self.updated_at = now;
        Ok(())
    }

    /// Moves the order to a new status.
    ///
    /// # Errors
    ///
    /// Returns the attempted transition as a `ValidationError` message when
    /// the state machine forbids it.
    pub fn transition_to(
        &mut self,
        next: OrderStatus,
        now: Timestamp,
    ) -> Result<(), crate::domain::foundation::ValidationError> {
        if !self.status.can_transition_to(next) {
            return Err(crate::domain::foundation::ValidationError::invalid_format(
                "status",
                format!("cannot move order from {} to {}", self.status, next),
            ));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}
