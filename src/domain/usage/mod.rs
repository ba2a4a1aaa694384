//! Usage-tracking domain.

mod record;

pub use record::{UsageRecord, UsageStats};
