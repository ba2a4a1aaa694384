//! In-memory CouponStore for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::coupon::{Coupon, CouponCode};
use crate::domain::foundation::{
    CampaignId, CouponId, DomainError, ErrorCode, Timestamp,
};
use crate::ports::{CouponFilter, CouponStore, Page};

/// HashMap-backed coupon store.
///
/// `reserve_usage` checks the cap predicate and increments inside a single
/// mutex acquisition, matching the atomicity of the SQL conditional update.
pub struct InMemoryCouponStore {
    coupons: Mutex<HashMap<CouponId, Coupon>>,
}

impl InMemoryCouponStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            coupons: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a store seeded with coupons.
    pub fn with_coupons(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        Self {
            coupons: Mutex::new(coupons.into_iter().map(|c| (c.id, c)).collect()),
        }
    }

    /// Returns the current usage counter, for test assertions.
    pub fn current_usage(&self, id: &CouponId) -> Option<u32> {
        self.coupons
            .lock()
            .expect("InMemoryCouponStore: lock poisoned")
            .get(id)
            .map(|c| c.current_usage)
    }
}

impl Default for InMemoryCouponStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CouponStore for InMemoryCouponStore {
    async fn insert(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut coupons = self.coupons.lock().expect("InMemoryCouponStore: lock poisoned");
        if coupons.values().any(|c| c.code == coupon.code) {
            return Err(DomainError::new(
                ErrorCode::DuplicateCouponCode,
                "Coupon code already exists",
            ));
        }
        coupons.insert(coupon.id, coupon.clone());
        Ok(())
    }

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let mut coupons = self.coupons.lock().expect("InMemoryCouponStore: lock poisoned");
        match coupons.get_mut(&coupon.id) {
            Some(existing) => {
                // Counter is owned by reserve/release, keep the stored one.
                let usage = existing.current_usage;
                *existing = coupon.clone();
                existing.current_usage = usage;
                Ok(())
            }
            None => Err(DomainError::new(ErrorCode::CouponNotFound, "Coupon not found")),
        }
    }

    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        Ok(self
            .coupons
            .lock()
            .expect("InMemoryCouponStore: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError> {
        Ok(self
            .coupons
            .lock()
            .expect("InMemoryCouponStore: lock poisoned")
            .values()
            .find(|c| &c.code == code)
            .cloned())
    }

    async fn list(
        &self,
        filter: CouponFilter,
        page: Page,
    ) -> Result<(Vec<Coupon>, u64), DomainError> {
        let coupons = self.coupons.lock().expect("InMemoryCouponStore: lock poisoned");
        let mut matching: Vec<Coupon> = coupons
            .values()
            .filter(|c| filter.campaign_id.map_or(true, |id| c.campaign_id == id))
            .filter(|c| filter.is_active.map_or(true, |a| c.is_active == a))
            .filter(|c| filter.code.as_ref().map_or(true, |code| &c.code == code))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok((items, total))
    }

    async fn list_redeemable(&self, now: Timestamp) -> Result<Vec<Coupon>, DomainError> {
        let coupons = self.coupons.lock().expect("InMemoryCouponStore: lock poisoned");
        Ok(coupons
            .values()
            .filter(|c| {
                c.is_active
                    && !now.is_before(&c.start_at)
                    && !now.is_after(&c.expires_at)
                    && c.has_usage_headroom()
            })
            .cloned()
            .collect())
    }

    async fn reserve_usage(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        let mut coupons = self.coupons.lock().expect("InMemoryCouponStore: lock poisoned");
        let coupon = coupons
            .get_mut(id)
            .ok_or_else(|| DomainError::new(ErrorCode::CouponNotFound, "Coupon not found"))?;

        if !coupon.has_usage_headroom() {
            return Ok(None);
        }
        coupon.current_usage += 1;
        Ok(Some(coupon.clone()))
    }

    async fn release_usage(&self, id: &CouponId) -> Result<(), DomainError> {
        let mut coupons = self.coupons.lock().expect("InMemoryCouponStore: lock poisoned");
        if let Some(coupon) = coupons.get_mut(id) {
            coupon.current_usage = coupon.current_usage.saturating_sub(1);
        }
        Ok(())
    }

    async fn deactivate_for_campaign(&self, campaign_id: &CampaignId) -> Result<u64, DomainError> {
        let mut coupons = self.coupons.lock().expect("InMemoryCouponStore: lock poisoned");
        let mut affected = 0;
        for coupon in coupons.values_mut() {
            if &coupon.campaign_id == campaign_id && coupon.is_active {
                coupon.is_active = false;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete(&self, id: &CouponId) -> Result<(), DomainError> {
        let mut coupons = self.coupons.lock().expect("InMemoryCouponStore: lock poisoned");
        match coupons.remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::new(ErrorCode::CouponNotFound, "Coupon not found")),
        }
    }
}
