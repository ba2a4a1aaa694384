//! In-memory UsageLog for tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::{CouponId, DomainError, Money, UserId};
use crate::domain::usage::{UsageRecord, UsageStats};
use crate::ports::{Page, UsageFilter, UsageLog};

/// Vec-backed append-only usage log.
pub struct InMemoryUsageLog {
    records: Mutex<Vec<UsageRecord>>,
}

impl InMemoryUsageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Creates a log seeded with records.
    pub fn with_records(records: impl IntoIterator<Item = UsageRecord>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().collect()),
        }
    }

    /// Number of appended records, for test assertions.
    pub fn record_count(&self) -> usize {
        self.records
            .lock()
            .expect("InMemoryUsageLog: lock poisoned")
            .len()
    }
}

impl Default for InMemoryUsageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageLog for InMemoryUsageLog {
    async fn append(&self, record: &UsageRecord) -> Result<(), DomainError> {
        self.records
            .lock()
            .expect("InMemoryUsageLog: lock poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn count_for_user(
        &self,
        coupon_id: &CouponId,
        user_id: &UserId,
    ) -> Result<u32, DomainError> {
        let records = self.records.lock().expect("InMemoryUsageLog: lock poisoned");
        Ok(records
            .iter()
            .filter(|r| &r.coupon_id == coupon_id && &r.user_id == user_id)
            .count() as u32)
    }

    async fn list(
        &self,
        filter: UsageFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, u64), DomainError> {
        let records = self.records.lock().expect("InMemoryUsageLog: lock poisoned");
        let mut matching: Vec<UsageRecord> = records
            .iter()
            .filter(|r| filter.coupon_id.map_or(true, |id| r.coupon_id == id))
            .filter(|r| filter.user_id.map_or(true, |id| r.user_id == id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.used_at.cmp(&a.used_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok((items, total))
    }

    async fn stats(&self, coupon_id: &CouponId) -> Result<UsageStats, DomainError> {
        let records = self.records.lock().expect("InMemoryUsageLog: lock poisoned");
        let matching: Vec<&UsageRecord> = records
            .iter()
            .filter(|r| &r.coupon_id == coupon_id)
            .collect();

        let total_usage = matching.len() as u64;
        if total_usage == 0 {
            return Ok(UsageStats::default());
        }

        let total_discount = matching
            .iter()
            .fold(Money::ZERO, |acc, r| acc + r.discount_amount);
        let total_revenue = matching
            .iter()
            .fold(Money::ZERO, |acc, r| acc + r.final_amount);
        let average_discount = Money::from_cents(total_discount.cents() / total_usage as i64)
            .unwrap_or(Money::ZERO);

        Ok(UsageStats {
            total_usage,
            total_discount,
            total_revenue,
            average_discount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrderId, Timestamp};

    fn record_for(coupon_id: CouponId, user_id: UserId, discount_cents: i64) -> UsageRecord {
        UsageRecord::new(
            coupon_id,
            crate::domain::coupon::CouponCode::try_new("SAVE10").unwrap(),
            user_id,
            OrderId::new(),
            Money::from_cents(5_000).unwrap(),
            Money::from_cents(discount_cents).unwrap(),
            Money::from_cents(5_000 - discount_cents).unwrap(),
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn count_for_user_scopes_to_pair() {
        let coupon = CouponId::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let log = InMemoryUsageLog::with_records([
            record_for(coupon, alice, 500),
            record_for(coupon, alice, 500),
            record_for(coupon, bob, 500),
            record_for(CouponId::new(), alice, 500),
        ]);

        assert_eq!(log.count_for_user(&coupon, &alice).await.unwrap(), 2);
        assert_eq!(log.count_for_user(&coupon, &bob).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn stats_aggregates_per_coupon() {
        let coupon = CouponId::new();
        let log = InMemoryUsageLog::with_records([
            record_for(coupon, UserId::new(), 400),
            record_for(coupon, UserId::new(), 600),
            record_for(CouponId::new(), UserId::new(), 999),
        ]);

        let stats = log.stats(&coupon).await.unwrap();
        assert_eq!(stats.total_usage, 2);
        assert_eq!(stats.total_discount.cents(), 1_000);
        assert_eq!(stats.total_revenue.cents(), 9_000);
        assert_eq!(stats.average_discount.cents(), 500);
    }

    #[tokio::test]
    async fn stats_for_unused_coupon_is_zero() {
        let log = InMemoryUsageLog::new();
        let stats = log.stats(&CouponId::new()).await.unwrap();
        assert_eq!(stats.total_usage, 0);
        assert!(stats.total_discount.is_zero());
    }
}
