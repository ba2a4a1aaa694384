//! PostgreSQL adapter implementations.
//!
//! One repository per aggregate, all sharing a `PgPool`. The coupon store
//! carries the atomic usage reservation; see its module docs.

mod campaign_repository;
mod coupon_store;
mod order_repository;
mod usage_log;

pub use campaign_repository::PostgresCampaignRepository;
pub use coupon_store::PostgresCouponStore;
pub use order_repository::PostgresOrderRepository;
pub use usage_log::PostgresUsageLog;

use crate::domain::foundation::{DomainError, ErrorCode, Money};

/// Converts a stored cents value back into Money.
///
/// Stored amounts are non-negative by check constraint; a negative value
/// here means the row was tampered with outside the application.
pub(crate) fn money_from_db(cents: i64, field: &str) -> Result<Money, DomainError> {
    Money::from_cents(cents).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid stored amount for {}: {}", field, cents),
        )
    })
}
