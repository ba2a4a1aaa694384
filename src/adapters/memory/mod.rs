//! In-memory adapter implementations for testing.
//!
//! Deterministic, lock-based stands-ins for the Postgres adapters. The
//! coupon store performs its reservation under one mutex acquisition, so it
//! honors the same atomicity contract the SQL conditional update provides
//! and can back the concurrency tests.
//!
//! Not for production use: locks use `.expect()` and everything lives in
//! process memory.

mod campaign_repository;
mod coupon_store;
mod order_repository;
mod usage_log;

pub use campaign_repository::InMemoryCampaignRepository;
pub use coupon_store::InMemoryCouponStore;
pub use order_repository::InMemoryOrderRepository;
pub use usage_log::InMemoryUsageLog;
