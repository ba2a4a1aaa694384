//! Coupon-specific error taxonomy.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Rejected | 400 |
//! | UserLimitReached | 400 |
//! | OrderNotFound | 404 |
//! | OrderNotOwned | 403 |
//! | OrderNotPending | 409 |
//! | DuplicateCode | 409 |
//! | CampaignNotFound | 404 |
//! | ValidationFailed | 400 |
//! | Store | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, Money, ValidationError};

/// Why a coupon failed its eligibility rules.
///
/// Variants are ordered the way the checks run; the first failing rule wins
/// so users always see a deterministic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The coupon has been switched off by an admin.
    Inactive,
    /// The coupon's start date is in the future.
    NotStarted,
    /// The coupon's expiry date has passed.
    Expired,
    /// The global usage cap is exhausted.
    UsageLimitReached,
    /// The purchase amount is below the coupon's floor.
    BelowMinimum { minimum: Money },
}

impl RejectionReason {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::Inactive => "INACTIVE",
            RejectionReason::NotStarted => "NOT_STARTED",
            RejectionReason::Expired => "EXPIRED",
            RejectionReason::UsageLimitReached => "USAGE_LIMIT_REACHED",
            RejectionReason::BelowMinimum { .. } => "BELOW_MINIMUM",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::Inactive => write!(f, "Coupon is not active"),
            RejectionReason::NotStarted => write!(f, "Coupon is not yet valid"),
            RejectionReason::Expired => write!(f, "Coupon has expired"),
            RejectionReason::UsageLimitReached => write!(f, "Coupon usage limit reached"),
            RejectionReason::BelowMinimum { minimum } => {
                write!(f, "Minimum purchase amount of {} required", minimum)
            }
        }
    }
}

/// Errors from coupon operations, including the redemption path.
#[derive(Debug, Clone, Error)]
pub enum CouponError {
    #[error("Coupon not found")]
    NotFound,

    #[error("{0}")]
    Rejected(RejectionReason),

    #[error("You have already used this coupon the maximum number of times")]
    UserLimitReached,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Order belongs to another user")]
    OrderNotOwned,

    #[error("Coupon can only be applied to a pending order")]
    OrderNotPending,

    #[error("Coupon code already exists")]
    DuplicateCode,

    #[error("Campaign not found")]
    CampaignNotFound,

    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),

    /// Transient infrastructure failure; the whole redemption is safe to
    /// retry because nothing is reserved before the atomic step succeeds.
    #[error("Storage error: {0}")]
    Store(DomainError),
}

impl From<DomainError> for CouponError {
    fn from(err: DomainError) -> Self {
        CouponError::Store(err)
    }
}

impl From<RejectionReason> for CouponError {
    fn from(reason: RejectionReason) -> Self {
        CouponError::Rejected(reason)
    }
}
