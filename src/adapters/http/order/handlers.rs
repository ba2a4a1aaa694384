//! HTTP handlers for order endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::order::CreateOrderCommand;
use crate::domain::foundation::{Money, OrderId};

use super::super::middleware::{RequireAdmin, RequireAuth};
use super::super::{ApiError, AppState, PageMeta, PageQuery};
use super::dto::{
    CreateOrderRequest, OrderListResponse, OrderResponse, UpdateOrderStatusRequest,
};

/// POST /api/orders - Create a pending order.
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let total = Money::from_major_units(request.total)?;

    let handler = state.order_handler();
    let order = handler.create(&user, CreateOrderCommand { total }).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// GET /api/orders - List the caller's own orders.
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.to_page();
    let handler = state.order_handler();
    let (orders, total) = handler.list_own(&user, page).await?;

    Ok(Json(OrderListResponse {
        orders: orders.into_iter().map(OrderResponse::from).collect(),
        pagination: PageMeta::new(page, total),
    }))
}

/// GET /api/orders/all - List every order (admin only).
pub async fn list_all_orders(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.to_page();
    let handler = state.order_handler();
    let (orders, total) = handler.list_all(&admin, page).await?;

    Ok(Json(OrderListResponse {
        orders: orders.into_iter().map(OrderResponse::from).collect(),
        pagination: PageMeta::new(page, total),
    }))
}

/// GET /api/orders/:id - Fetch one order (owner or admin).
pub async fn get_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.order_handler();
    let order = handler.get(&user, &OrderId::from_uuid(id)).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// POST /api/orders/:id/status - Transition an order.
///
/// Owners may cancel their own pending order; every other transition is
/// admin only.
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let next = request.to_status()?;

    let handler = state.order_handler();
    let order = handler
        .update_status(&user, &OrderId::from_uuid(id), next)
        .await?;
    Ok(Json(OrderResponse::from(order)))
}
