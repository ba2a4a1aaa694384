//! CampaignRepository port.

use async_trait::async_trait;

use crate::domain::campaign::Campaign;
use crate::domain::foundation::{CampaignId, DomainError};

use super::Page;

/// Repository port for campaign persistence.
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Insert a new campaign.
    ///
    /// # Errors
    ///
    /// - `DuplicateCampaignName` if the name is already taken
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, campaign: &Campaign) -> Result<(), DomainError>;

    /// Update an existing campaign.
    async fn update(&self, campaign: &Campaign) -> Result<(), DomainError>;

    /// Find a campaign by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<Campaign>, DomainError>;

    /// List campaigns, newest first, optionally filtered by active flag,
    /// with the total count.
    async fn list(
        &self,
        is_active: Option<bool>,
        page: Page,
    ) -> Result<(Vec<Campaign>, u64), DomainError>;

    /// Delete a campaign record.
    ///
    /// Callers are expected to deactivate the campaign's coupons first
    /// (see `CouponStore::deactivate_for_campaign`).
    ///
    /// # Errors
    ///
    /// - `CampaignNotFound` if the campaign doesn't exist
    async fn delete(&self, id: &CampaignId) -> Result<(), DomainError>;
}
