//! CouponAdminHandler - CRUD and lifecycle operations for coupons.
//!
//! Everything here is admin-facing except `list_redeemable`, which backs the
//! public browse endpoint. None of these operations touch `current_usage`;
//! the counter only moves through the store's reservation calls.

use std::sync::Arc;

use crate::domain::coupon::{Coupon, CouponCode, CouponError, Discount};
use crate::domain::foundation::{
    CampaignId, CouponId, DomainError, ErrorCode, Money, Timestamp, UserId,
};
use crate::ports::{CampaignRepository, CouponFilter, CouponStore, Page};

/// Command to create a coupon under a campaign.
#[derive(Debug, Clone)]
pub struct CreateCouponCommand {
    pub code: String,
    pub description: Option<String>,
    pub discount: Discount,
    pub min_purchase: Money,
    pub start_at: Timestamp,
    pub expires_at: Timestamp,
    pub max_usage: Option<u32>,
    pub user_max_usage: u32,
    pub campaign_id: CampaignId,
    pub created_by: UserId,
}

/// Command to update a coupon's configuration. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCouponCommand {
    pub description: Option<String>,
    pub discount: Option<Discount>,
    pub min_purchase: Option<Money>,
    pub start_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub max_usage: Option<Option<u32>>,
    pub user_max_usage: Option<u32>,
}

/// Handler for coupon management.
pub struct CouponAdminHandler {
    coupons: Arc<dyn CouponStore>,
    campaigns: Arc<dyn CampaignRepository>,
}

impl CouponAdminHandler {
    pub fn new(coupons: Arc<dyn CouponStore>, campaigns: Arc<dyn CampaignRepository>) -> Self {
        Self { coupons, campaigns }
    }

    pub async fn create(&self, cmd: CreateCouponCommand) -> Result<Coupon, CouponError> {
        let now = Timestamp::now();

        // 1. The campaign must exist before a coupon can reference it
        self.campaigns
            .find_by_id(&cmd.campaign_id)
            .await?
            .ok_or(CouponError::CampaignNotFound)?;

        // 2. Build the aggregate; this runs all write-time validation
        let code = CouponCode::try_new(&cmd.code)?;
        let coupon = Coupon::new(
            CouponId::new(),
            code,
            cmd.description,
            cmd.discount,
            cmd.min_purchase,
            cmd.start_at,
            cmd.expires_at,
            cmd.max_usage,
            cmd.user_max_usage,
            cmd.campaign_id,
            cmd.created_by,
            now,
        )?;

        // 3. Persist; the unique index on the code is the final word on
        //    duplicates
        self.coupons
            .insert(&coupon)
            .await
            .map_err(map_duplicate_code)?;

        tracing::info!(coupon_id = %coupon.id, code = %coupon.code, "coupon created");
        Ok(coupon)
    }

    pub async fn get(&self, id: &CouponId) -> Result<Coupon, CouponError> {
        self.coupons
            .find_by_id(id)
            .await?
            .ok_or(CouponError::NotFound)
    }

    pub async fn list(
        &self,
        filter: CouponFilter,
        page: Page,
    ) -> Result<(Vec<Coupon>, u64), CouponError> {
        Ok(self.coupons.list(filter, page).await?)
    }

    /// Coupons a shopper could redeem right now. Backs the public browse
    /// endpoint, so the result deliberately omits nothing but headroom,
    /// window and active-flag filtering.
    pub async fn list_redeemable(&self) -> Result<Vec<Coupon>, CouponError> {
        Ok(self.coupons.list_redeemable(Timestamp::now()).await?)
    }

    pub async fn update(
        &self,
        id: &CouponId,
        cmd: UpdateCouponCommand,
    ) -> Result<Coupon, CouponError> {
        let now = Timestamp::now();
        let mut coupon = self.get(id).await?;

        if let Some(description) = cmd.description {
            coupon.description = Some(description);
        }
        if let Some(discount) = cmd.discount {
            coupon.discount = discount;
        }
        if let Some(min_purchase) = cmd.min_purchase {
            coupon.min_purchase = min_purchase;
        }
        if let Some(start_at) = cmd.start_at {
            coupon.start_at = start_at;
        }
        if let Some(expires_at) = cmd.expires_at {
            coupon.expires_at = expires_at;
        }
        if let Some(max_usage) = cmd.max_usage {
            if max_usage == Some(0) {
                return Err(CouponError::ValidationFailed(
                    crate::domain::foundation::ValidationError::out_of_range(
                        "max_usage",
                        1,
                        i64::MAX,
                        0,
                    ),
                ));
            }
            coupon.max_usage = max_usage;
        }
        if let Some(user_max_usage) = cmd.user_max_usage {
            if user_max_usage == 0 {
                return Err(CouponError::ValidationFailed(
                    crate::domain::foundation::ValidationError::out_of_range(
                        "user_max_usage",
                        1,
                        i64::MAX,
                        0,
                    ),
                ));
            }
            coupon.user_max_usage = user_max_usage;
        }

        // The window invariant must hold for the merged result
        Coupon::validate_window(coupon.start_at, coupon.expires_at)?;
        coupon.updated_at = now;

        self.coupons.update(&coupon).await?;
        Ok(coupon)
    }

    pub async fn activate(&self, id: &CouponId) -> Result<Coupon, CouponError> {
        let mut coupon = self.get(id).await?;
        coupon.activate(Timestamp::now());
        self.coupons.update(&coupon).await?;
        Ok(coupon)
    }

    pub async fn deactivate(&self, id: &CouponId) -> Result<Coupon, CouponError> {
        let mut coupon = self.get(id).await?;
        coupon.deactivate(Timestamp::now());
        self.coupons.update(&coupon).await?;
        Ok(coupon)
    }

    /// Hard delete. Usage records survive because they snapshot the code
    /// and amounts; deactivation is the gentler alternative.
    pub async fn delete(&self, id: &CouponId) -> Result<(), CouponError> {
        self.coupons.delete(id).await.map_err(|err| match err.code {
            ErrorCode::CouponNotFound => CouponError::NotFound,
            _ => CouponError::Store(err),
        })?;
        tracing::info!(coupon_id = %id, "coupon deleted");
        Ok(())
    }
}

fn map_duplicate_code(err: DomainError) -> CouponError {
    match err.code {
        ErrorCode::DuplicateCouponCode => CouponError::DuplicateCode,
        _ => CouponError::Store(err),
    }
}
