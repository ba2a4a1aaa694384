//! In-memory CampaignRepository for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::campaign::Campaign;
use crate::domain::foundation::{CampaignId, DomainError, ErrorCode};
use crate::ports::{CampaignRepository, Page};

/// HashMap-backed campaign repository.
pub struct InMemoryCampaignRepository {
    campaigns: Mutex<HashMap<CampaignId, Campaign>>,
}

impl InMemoryCampaignRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            campaigns: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a repository seeded with campaigns.
    pub fn with_campaigns(campaigns: impl IntoIterator<Item = Campaign>) -> Self {
        Self {
            campaigns: Mutex::new(campaigns.into_iter().map(|c| (c.id, c)).collect()),
        }
    }
}

impl Default for InMemoryCampaignRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CampaignRepository for InMemoryCampaignRepository {
    async fn insert(&self, campaign: &Campaign) -> Result<(), DomainError> {
        let mut campaigns = self
            .campaigns
            .lock()
            .expect("InMemoryCampaignRepository: lock poisoned");
        if campaigns.values().any(|c| c.name == campaign.name) {
            return Err(DomainError::new(
                ErrorCode::DuplicateCampaignName,
                "Campaign name already exists",
            ));
        }
        campaigns.insert(campaign.id, campaign.clone());
        Ok(())
    }

    async fn update(&self, campaign: &Campaign) -> Result<(), DomainError> {
        let mut campaigns = self
            .campaigns
            .lock()
            .expect("InMemoryCampaignRepository: lock poisoned");
        match campaigns.get_mut(&campaign.id) {
            Some(existing) => {
                *existing = campaign.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::CampaignNotFound,
                "Campaign not found",
            )),
        }
    }

    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<Campaign>, DomainError> {
        Ok(self
            .campaigns
            .lock()
            .expect("InMemoryCampaignRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn list(
        &self,
        is_active: Option<bool>,
        page: Page,
    ) -> Result<(Vec<Campaign>, u64), DomainError> {
        let campaigns = self
            .campaigns
            .lock()
            .expect("InMemoryCampaignRepository: lock poisoned");
        let mut matching: Vec<Campaign> = campaigns
            .values()
            .filter(|c| is_active.map_or(true, |a| c.is_active == a))
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

    async fn delete(&self, id: &CampaignId) -> Result<(), DomainError> {
        let mut campaigns = self
            .campaigns
            .lock()
            .expect("InMemoryCampaignRepository: lock poisoned");
        match campaigns.remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::new(
                ErrorCode::CampaignNotFound,
                "Campaign not found",
            )),
        }
    }
}
