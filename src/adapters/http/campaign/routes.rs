//! Axum routes for campaign endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::AppState;
use super::handlers::{
    activate_campaign, create_campaign, deactivate_campaign, delete_campaign, get_campaign,
    list_campaigns, update_campaign,
};

/// Routes mounted under `/api/campaigns`.
///
/// - `GET /` - list with `isActive` filter (authenticated)
/// - `POST /` - create (admin)
/// - `GET /:id` - fetch one (authenticated)
/// - `PUT /:id` - update (admin)
/// - `DELETE /:id` - delete, deactivating its coupons (admin)
/// - `POST /:id/activate` / `POST /:id/deactivate` - lifecycle (admin)
pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_campaigns).post(create_campaign))
        .route(
            "/:id",
            get(get_campaign)
                .put(update_campaign)
                .delete(delete_campaign),
        )
        .route("/:id/activate", post(activate_campaign))
        .route("/:id/deactivate", post(deactivate_campaign))
}
