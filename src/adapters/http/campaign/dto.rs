//! JSON request/response types for campaign endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::campaign::Campaign;

use super::super::PageMeta;

/// Request to create a campaign.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Request to update a campaign. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
}

/// Filters for the campaign listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListQuery {
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Campaign view for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_at: String,
    pub end_at: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Campaign> for CampaignResponse {
    fn from(campaign: Campaign) -> Self {
        Self {
            id: *campaign.id.as_uuid(),
            name: campaign.name,
            description: campaign.description,
            start_at: campaign.start_at.as_datetime().to_rfc3339(),
            end_at: campaign.end_at.as_datetime().to_rfc3339(),
            is_active: campaign.is_active,
            created_at: campaign.created_at.as_datetime().to_rfc3339(),
            updated_at: campaign.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Paginated campaign listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListResponse {
    pub campaigns: Vec<CampaignResponse>,
    pub pagination: PageMeta,
}

/// Result of deleting a campaign.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDeletionResponse {
    pub coupons_deactivated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_deserializes() {
        let json = r#"{
            "name": "Spring Sale",
            "startAt": "2026-03-01T00:00:00Z",
            "endAt": "2026-04-01T00:00:00Z"
        }"#;
        let request: CreateCampaignRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Spring Sale");
        assert!(request.description.is_none());
    }

    #[test]
    fn update_request_accepts_partial_body() {
        let request: UpdateCampaignRequest =
            serde_json::from_str(r#"{"name": "Renamed"}"#).unwrap();
        assert_eq!(request.name.as_deref(), Some("Renamed"));
        assert!(request.start_at.is_none());
    }
}
