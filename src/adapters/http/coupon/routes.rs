//! Axum routes for coupon admin and usage endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::AppState;
use super::handlers::{
    activate_coupon, create_coupon, deactivate_coupon, delete_coupon, get_coupon,
    get_coupon_stats, list_coupons, list_redeemable_coupons, list_usage, update_coupon,
};

/// Routes mounted under `/api/coupons`.
///
/// - `GET /` - list with filters (admin)
/// - `POST /` - create (admin)
/// - `GET /redeemable` - currently redeemable coupons (authenticated)
/// - `GET /:id` - fetch one (authenticated)
/// - `PUT /:id` - update (admin)
/// - `DELETE /:id` - hard delete (admin)
/// - `POST /:id/activate` / `POST /:id/deactivate` - lifecycle (admin)
/// - `GET /:id/stats` - usage statistics (admin)
pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coupons).post(create_coupon))
        .route("/redeemable", get(list_redeemable_coupons))
        .route(
            "/:id",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
        .route("/:id/activate", post(activate_coupon))
        .route("/:id/deactivate", post(deactivate_coupon))
        .route("/:id/stats", get(get_coupon_stats))
}

/// Routes mounted under `/api/usage`.
///
/// - `GET /` - redemption audit trail (non-admins see only their own)
pub fn usage_routes() -> Router<AppState> {
    Router::new().route("/", get(list_usage))
}
