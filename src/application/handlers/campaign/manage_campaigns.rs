//! CampaignAdminHandler - CRUD and lifecycle operations for campaigns.

use std::sync::Arc;

use crate::domain::campaign::Campaign;
use crate::domain::coupon::CouponError;
use crate::domain::foundation::{CampaignId, ErrorCode, Timestamp, UserId};
use crate::ports::{CampaignRepository, CouponStore, Page};

/// Command to create a campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaignCommand {
    pub name: String,
    pub description: Option<String>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub created_by: UserId,
}

/// Command to update a campaign. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCampaignCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
}

/// Result of deleting a campaign.
#[derive(Debug, Clone, Copy)]
pub struct CampaignDeletion {
    /// How many of the campaign's coupons were deactivated in the cascade.
    pub coupons_deactivated: u64,
}

/// Handler for campaign management.
pub struct CampaignAdminHandler {
    campaigns: Arc<dyn CampaignRepository>,
    coupons: Arc<dyn CouponStore>,
}

impl CampaignAdminHandler {
    pub fn new(campaigns: Arc<dyn CampaignRepository>, coupons: Arc<dyn CouponStore>) -> Self {
        Self { campaigns, coupons }
    }

    pub async fn create(&self, cmd: CreateCampaignCommand) -> Result<Campaign, CouponError> {
        let campaign = Campaign::new(
            CampaignId::new(),
            cmd.name,
            cmd.description,
            cmd.start_at,
            cmd.end_at,
            cmd.created_by,
            Timestamp::now(),
        )?;

        // Duplicate names surface as a DuplicateCampaignName store error,
        // mapped to a conflict at the HTTP boundary
        self.campaigns.insert(&campaign).await?;

        tracing::info!(campaign_id = %campaign.id, name = %campaign.name, "campaign created");
        Ok(campaign)
    }

    pub async fn get(&self, id: &CampaignId) -> Result<Campaign, CouponError> {
        self.campaigns
            .find_by_id(id)
            .await?
            .ok_or(CouponError::CampaignNotFound)
    }

    pub async fn list(
        &self,
        is_active: Option<bool>,
        page: Page,
    ) -> Result<(Vec<Campaign>, u64), CouponError> {
        Ok(self.campaigns.list(is_active, page).await?)
    }

    pub async fn update(
        &self,
        id: &CampaignId,
        cmd: UpdateCampaignCommand,
    ) -> Result<Campaign, CouponError> {
        let existing = self.get(id).await?;

        // Re-run construction validation over the merged fields
        let mut campaign = Campaign::new(
            existing.id,
            cmd.name.unwrap_or(existing.name),
            cmd.description.or(existing.description),
            cmd.start_at.unwrap_or(existing.start_at),
            cmd.end_at.unwrap_or(existing.end_at),
            existing.created_by,
            Timestamp::now(),
        )?;
        campaign.is_active = existing.is_active;
        campaign.created_at = existing.created_at;

        self.campaigns.update(&campaign).await?;
        Ok(campaign)
    }

    pub async fn activate(&self, id: &CampaignId) -> Result<Campaign, CouponError> {
        let mut campaign = self.get(id).await?;
        campaign.activate(Timestamp::now());
        self.campaigns.update(&campaign).await?;
        Ok(campaign)
    }

    pub async fn deactivate(&self, id: &CampaignId) -> Result<Campaign, CouponError> {
        let mut campaign = self.get(id).await?;
        campaign.deactivate(Timestamp::now());
        self.campaigns.update(&campaign).await?;
        Ok(campaign)
    }

    /// Deletes a campaign after deactivating its coupons, so no orphaned
    /// coupon stays redeemable.
    pub async fn delete(&self, id: &CampaignId) -> Result<CampaignDeletion, CouponError> {
        // Confirm existence first so the cascade never runs for a bad id
        self.get(id).await?;

        // 1. Cascade: switch off every coupon in the campaign
        let coupons_deactivated = self.coupons.deactivate_for_campaign(id).await?;

        // 2. Remove the campaign itself
        self.campaigns.delete(id).await.map_err(|err| match err.code {
            ErrorCode::CampaignNotFound => CouponError::CampaignNotFound,
            _ => CouponError::Store(err),
        })?;

        tracing::info!(
            campaign_id = %id,
            coupons_deactivated,
            "campaign deleted"
        );
        Ok(CampaignDeletion {
            coupons_deactivated,
        })
    }
}
