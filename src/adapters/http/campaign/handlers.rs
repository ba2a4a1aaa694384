//! HTTP handlers for campaign endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::campaign::{CreateCampaignCommand, UpdateCampaignCommand};
use crate::domain::foundation::{CampaignId, Timestamp};
use crate::ports::Page;

use super::super::middleware::{RequireAdmin, RequireAuth};
use super::super::{ApiError, AppState, PageMeta};
use super::dto::{
    CampaignDeletionResponse, CampaignListQuery, CampaignListResponse, CampaignResponse,
    CreateCampaignRequest, UpdateCampaignRequest,
};

/// POST /api/campaigns - Create a campaign (admin only).
pub async fn create_campaign(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.campaign_admin_handler();
    let cmd = CreateCampaignCommand {
        name: request.name,
        description: request.description,
        start_at: Timestamp::from_datetime(request.start_at),
        end_at: Timestamp::from_datetime(request.end_at),
        created_by: admin.user_id,
    };

    let campaign = handler.create(cmd).await?;
    Ok((StatusCode::CREATED, Json(CampaignResponse::from(campaign))))
}

/// GET /api/campaigns - List campaigns.
pub async fn list_campaigns(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<CampaignListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::new(query.page.unwrap_or(1), query.page_size.unwrap_or(10));

    let handler = state.campaign_admin_handler();
    let (campaigns, total) = handler.list(query.is_active, page).await?;

    Ok(Json(CampaignListResponse {
        campaigns: campaigns.into_iter().map(CampaignResponse::from).collect(),
        pagination: PageMeta::new(page, total),
    }))
}

/// GET /api/campaigns/:id - Fetch one campaign.
pub async fn get_campaign(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.campaign_admin_handler();
    let campaign = handler.get(&CampaignId::from_uuid(id)).await?;
    Ok(Json(CampaignResponse::from(campaign)))
}

/// PUT /api/campaigns/:id - Update a campaign (admin only).
pub async fn update_campaign(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.campaign_admin_handler();
    let cmd = UpdateCampaignCommand {
        name: request.name,
        description: request.description,
        start_at: request.start_at.map(Timestamp::from_datetime),
        end_at: request.end_at.map(Timestamp::from_datetime),
    };

    let campaign = handler.update(&CampaignId::from_uuid(id), cmd).await?;
    Ok(Json(CampaignResponse::from(campaign)))
}

/// POST /api/campaigns/:id/activate - Switch a campaign on (admin only).
pub async fn activate_campaign(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.campaign_admin_handler();
    let campaign = handler.activate(&CampaignId::from_uuid(id)).await?;
    Ok(Json(CampaignResponse::from(campaign)))
}

/// POST /api/campaigns/:id/deactivate - Switch a campaign off (admin only).
pub async fn deactivate_campaign(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.campaign_admin_handler();
    let campaign = handler.deactivate(&CampaignId::from_uuid(id)).await?;
    Ok(Json(CampaignResponse::from(campaign)))
}

/// DELETE /api/campaigns/:id - Delete a campaign (admin only).
///
/// The campaign's coupons are deactivated, not removed, so their audit
/// history stays reachable.
pub async fn delete_campaign(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.campaign_admin_handler();
    let deletion = handler.delete(&CampaignId::from_uuid(id)).await?;
    Ok(Json(CampaignDeletionResponse {
        coupons_deactivated: deletion.coupons_deactivated,
    }))
}
