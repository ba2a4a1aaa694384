//! HTTP handlers for coupon admin and usage endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::coupon::{CreateCouponCommand, UpdateCouponCommand};
use crate::domain::coupon::{CouponCode, CouponError};
use crate::domain::foundation::{CampaignId, CouponId, Money, Timestamp, UserId};
use crate::ports::{CouponFilter, Page, UsageFilter};

use super::super::middleware::{RequireAdmin, RequireAuth};
use super::super::{ApiError, AppState, PageMeta};
use super::dto::{
    CouponListQuery, CouponListResponse, CouponResponse, CreateCouponRequest,
    UpdateCouponRequest, UsageListQuery, UsageListResponse, UsageRecordResponse,
    UsageStatsResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Coupon CRUD (admin)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/coupons - Create a coupon (admin only).
pub async fn create_coupon(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateCouponRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let discount = request.discount.to_domain()?;
    let min_purchase = Money::from_major_units(request.min_purchase)?;

    let handler = state.coupon_admin_handler();
    let cmd = CreateCouponCommand {
        code: request.code,
        description: request.description,
        discount,
        min_purchase,
        start_at: Timestamp::from_datetime(request.start_at),
        expires_at: Timestamp::from_datetime(request.expires_at),
        max_usage: request.max_usage,
        user_max_usage: request.user_max_usage,
        campaign_id: CampaignId::from_uuid(request.campaign_id),
        created_by: admin.user_id,
    };

    let coupon = handler.create(cmd).await?;
    Ok((StatusCode::CREATED, Json(CouponResponse::from(coupon))))
}

/// GET /api/coupons - List coupons with filters (admin only).
pub async fn list_coupons(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<CouponListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // A filter code that fails normalization can't match anything
    let code = query
        .code
        .as_deref()
        .map(CouponCode::try_new)
        .transpose()
        .map_err(|_| CouponError::NotFound)?;

    let filter = CouponFilter {
        campaign_id: query.campaign_id.map(CampaignId::from_uuid),
        is_active: query.is_active,
        code,
    };
    let page = Page::new(query.page.unwrap_or(1), query.page_size.unwrap_or(10));

    let handler = state.coupon_admin_handler();
    let (coupons, total) = handler.list(filter, page).await?;

    Ok(Json(CouponListResponse {
        coupons: coupons.into_iter().map(CouponResponse::from).collect(),
        pagination: PageMeta::new(page, total),
    }))
}

/// GET /api/coupons/redeemable - Coupons redeemable right now.
pub async fn list_redeemable_coupons(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.coupon_admin_handler();
    let coupons = handler.list_redeemable().await?;
    let coupons: Vec<CouponResponse> = coupons.into_iter().map(CouponResponse::from).collect();
    Ok(Json(coupons))
}

/// GET /api/coupons/:id - Fetch one coupon.
pub async fn get_coupon(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.coupon_admin_handler();
    let coupon = handler.get(&CouponId::from_uuid(id)).await?;
    Ok(Json(CouponResponse::from(coupon)))
}

/// PUT /api/coupons/:id - Update a coupon's configuration (admin only).
pub async fn update_coupon(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCouponRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let discount = request.discount()?;
    let min_purchase = request
        .min_purchase
        .map(Money::from_major_units)
        .transpose()?;

    let handler = state.coupon_admin_handler();
    let cmd = UpdateCouponCommand {
        description: request.description,
        discount,
        min_purchase,
        start_at: request.start_at.map(Timestamp::from_datetime),
        expires_at: request.expires_at.map(Timestamp::from_datetime),
        max_usage: request.max_usage,
        user_max_usage: request.user_max_usage,
    };

    let coupon = handler.update(&CouponId::from_uuid(id), cmd).await?;
    Ok(Json(CouponResponse::from(coupon)))
}

/// POST /api/coupons/:id/activate - Switch a coupon on (admin only).
pub async fn activate_coupon(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.coupon_admin_handler();
    let coupon = handler.activate(&CouponId::from_uuid(id)).await?;
    Ok(Json(CouponResponse::from(coupon)))
}

/// POST /api/coupons/:id/deactivate - Switch a coupon off (admin only).
pub async fn deactivate_coupon(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.coupon_admin_handler();
    let coupon = handler.deactivate(&CouponId::from_uuid(id)).await?;
    Ok(Json(CouponResponse::from(coupon)))
}

/// DELETE /api/coupons/:id - Hard delete a coupon (admin only).
///
/// Usage records survive; they snapshot the code and amounts.
pub async fn delete_coupon(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.coupon_admin_handler();
    handler.delete(&CouponId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Usage queries
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/coupons/:id/stats - Aggregate usage statistics (admin only).
pub async fn get_coupon_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.usage_query_handler();
    let stats = handler.stats(&CouponId::from_uuid(id)).await?;
    Ok(Json(UsageStatsResponse::from(stats)))
}

/// GET /api/usage - List redemption audit records.
///
/// Non-admin callers only ever see their own history; the handler pins the
/// filter regardless of the query parameters.
pub async fn list_usage(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<UsageListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = UsageFilter {
        coupon_id: query.coupon_id.map(CouponId::from_uuid),
        user_id: query.user_id.map(UserId::from_uuid),
    };
    let page = Page::new(query.page.unwrap_or(1), query.page_size.unwrap_or(10));

    let handler = state.usage_query_handler();
    let (records, total) = handler.list(&user, filter, page).await?;

    Ok(Json(UsageListResponse {
        records: records.into_iter().map(UsageRecordResponse::from).collect(),
        pagination: PageMeta::new(page, total),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::auth::MockTokenVerifier;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::{
        InMemoryCampaignRepository, InMemoryCouponStore, InMemoryOrderRepository,
        InMemoryUsageLog,
    };
    use crate::domain::campaign::Campaign;
    use crate::domain::foundation::{AuthenticatedUser, Role};

    fn test_campaign() -> Campaign {
        let now = Timestamp::now();
        Campaign::new(
            CampaignId::new(),
            "Spring Sale".to_string(),
            None,
            now.minus_days(1),
            now.add_days(30),
            UserId::new(),
            now,
        )
        .unwrap()
    }

    fn state_with_campaign() -> (AppState, CampaignId) {
        let campaign = test_campaign();
        let campaign_id = campaign.id;
        let state = AppState {
            coupons: Arc::new(InMemoryCouponStore::new()),
            campaigns: Arc::new(InMemoryCampaignRepository::with_campaigns(vec![campaign])),
            orders: Arc::new(InMemoryOrderRepository::new()),
            usage: Arc::new(InMemoryUsageLog::new()),
            events: Arc::new(InMemoryEventBus::new()),
            verifier: Arc::new(MockTokenVerifier::new()),
        };
        (state, campaign_id)
    }

    fn admin() -> RequireAdmin {
        RequireAdmin(AuthenticatedUser {
            user_id: UserId::new(),
            role: Role::Admin,
        })
    }

    fn create_request(campaign_id: CampaignId) -> CreateCouponRequest {
        let json = format!(
            r#"{{
                "code": "SAVE10",
                "discountType": "fixed",
                "discountValue": 10.0,
                "minPurchase": 20.0,
                "startAt": "2026-01-01T00:00:00Z",
                "expiresAt": "2027-01-01T00:00:00Z",
                "campaignId": "{}"
            }}"#,
            campaign_id.as_uuid()
        );
        serde_json::from_str(&json).unwrap()
    }

    #[tokio::test]
    async fn create_coupon_returns_created() {
        let (state, campaign_id) = state_with_campaign();
        let result =
            create_coupon(State(state), admin(), Json(create_request(campaign_id))).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn create_coupon_for_missing_campaign_fails() {
        let (state, _) = state_with_campaign();
        let result =
            create_coupon(State(state), admin(), Json(create_request(CampaignId::new()))).await;
        assert!(matches!(
            result.map(|_| ()),
            Err(ApiError(CouponError::CampaignNotFound))
        ));
    }

    #[tokio::test]
    async fn get_missing_coupon_is_not_found() {
        let (state, _) = state_with_campaign();
        let user = RequireAuth(AuthenticatedUser {
            user_id: UserId::new(),
            role: Role::User,
        });

        let result = get_coupon(State(state), user, Path(Uuid::new_v4())).await;
        assert!(matches!(
            result.map(|_| ()),
            Err(ApiError(CouponError::NotFound))
        ));
    }
}
