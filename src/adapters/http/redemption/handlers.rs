//! HTTP handlers for redemption endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::coupon::{RedeemCouponCommand, ValidateCouponCommand};
use crate::domain::foundation::{Money, OrderId};

use super::super::middleware::RequireAuth;
use super::super::{ApiError, AppState};
use super::dto::{RedeemRequest, RedeemResponse, ValidateRequest, ValidateResponse};

/// POST /api/coupons/redeem - Redeem a coupon against a purchase.
pub async fn redeem_coupon(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<RedeemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase_amount = Money::from_major_units(request.purchase_amount)?;

    let handler = state.redeem_handler();
    let cmd = RedeemCouponCommand {
        user_id: user.user_id,
        code: request.code,
        purchase_amount,
        order_id: request.order_id.map(OrderId::from_uuid),
    };

    let receipt = handler.handle(cmd).await?;
    Ok((StatusCode::OK, Json(RedeemResponse::from(receipt))))
}

/// POST /api/coupons/validate - Dry-run eligibility check.
pub async fn validate_coupon(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ValidateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase_amount = Money::from_major_units(request.purchase_amount)?;

    let handler = state.validate_handler();
    let cmd = ValidateCouponCommand {
        user_id: user.user_id,
        code: request.code,
        purchase_amount,
    };

    let validation = handler.handle(cmd).await?;
    Ok(Json(ValidateResponse::from(validation)))
}
