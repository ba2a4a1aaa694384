//! Usage-history handlers.

mod usage_queries;

pub use usage_queries::UsageQueryHandler;
