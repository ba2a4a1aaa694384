//! Axum routes for order endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::AppState;
use super::handlers::{
    create_order, get_order, list_all_orders, list_orders, update_order_status,
};

/// Routes mounted under `/api/orders`.
///
/// - `POST /` - create a pending order (authenticated)
/// - `GET /` - list own orders (authenticated)
/// - `GET /all` - list every order (admin)
/// - `GET /:id` - fetch one (owner or admin)
/// - `POST /:id/status` - status transition (owner cancel / admin)
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/all", get(list_all_orders))
        .route("/:id", get(get_order))
        .route("/:id/status", post(update_order_status))
}
