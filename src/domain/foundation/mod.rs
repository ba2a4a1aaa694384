//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects, identifiers, and error types that form the
//! vocabulary of the coupon domain.

mod auth;
mod errors;
mod events;
mod ids;
mod money;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId, SerializableDomainEvent};
pub use ids::{CampaignId, CouponId, OrderId, UsageRecordId, UserId};
pub use money::Money;
pub use timestamp::Timestamp;
