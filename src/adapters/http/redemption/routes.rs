//! Axum routes for the redemption endpoints.

use axum::{routing::post, Router};

use super::super::AppState;
use super::handlers::{redeem_coupon, validate_coupon};

/// Routes mounted under `/api/coupons`.
///
/// - `POST /redeem` - redeem a coupon (authenticated)
/// - `POST /validate` - dry-run eligibility check (authenticated)
pub fn redemption_routes() -> Router<AppState> {
    Router::new()
        .route("/redeem", post(redeem_coupon))
        .route("/validate", post(validate_coupon))
}
