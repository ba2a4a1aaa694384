//! HTTP adapters - REST API implementation.
//!
//! Each domain module has its own router/handlers/DTO triple; `api_router`
//! assembles them under `/api` behind the auth middleware.

pub mod campaign;
pub mod coupon;
pub mod error;
pub mod middleware;
pub mod order;
pub mod redemption;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::application::handlers::campaign::CampaignAdminHandler;
use crate::application::handlers::coupon::{
    CouponAdminHandler, RedeemCouponHandler, ValidateCouponHandler,
};
use crate::application::handlers::order::OrderHandler;
use crate::application::handlers::usage::UsageQueryHandler;
use crate::ports::{
    CampaignRepository, CouponStore, EventPublisher, OrderRepository, Page, TokenVerifier,
    UsageLog,
};

pub use error::{ApiError, ErrorResponse};

/// Shared application state.
///
/// Cloned per request; all dependencies are Arc-wrapped ports so handlers
/// are constructed on demand from the same adapters.
#[derive(Clone)]
pub struct AppState {
    pub coupons: Arc<dyn CouponStore>,
    pub campaigns: Arc<dyn CampaignRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub usage: Arc<dyn UsageLog>,
    pub events: Arc<dyn EventPublisher>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn redeem_handler(&self) -> RedeemCouponHandler {
        RedeemCouponHandler::new(
            self.coupons.clone(),
            self.orders.clone(),
            self.usage.clone(),
            self.events.clone(),
        )
    }

    pub fn validate_handler(&self) -> ValidateCouponHandler {
        ValidateCouponHandler::new(self.coupons.clone(), self.usage.clone())
    }

    pub fn coupon_admin_handler(&self) -> CouponAdminHandler {
        CouponAdminHandler::new(self.coupons.clone(), self.campaigns.clone())
    }

    pub fn campaign_admin_handler(&self) -> CampaignAdminHandler {
        CampaignAdminHandler::new(self.campaigns.clone(), self.coupons.clone())
    }

    pub fn order_handler(&self) -> OrderHandler {
        OrderHandler::new(self.orders.clone())
    }

    pub fn usage_query_handler(&self) -> UsageQueryHandler {
        UsageQueryHandler::new(self.usage.clone(), self.coupons.clone())
    }
}

/// Pagination query parameters shared by listing endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn to_page(self) -> Page {
        Page::new(self.page.unwrap_or(1), self.page_size.unwrap_or(10))
    }
}

/// Pagination metadata returned by listing endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(page: Page, total: u64) -> Self {
        Self {
            page: page.number,
            page_size: page.size,
            total,
            total_pages: page.pages_for(total),
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Assembles the complete API router.
///
/// All `/api` routes sit behind the auth middleware; individual handlers
/// enforce authentication and the admin role through extractors.
pub fn api_router(state: AppState) -> Router {
    let verifier = state.verifier.clone();

    let api = Router::new()
        .nest(
            "/coupons",
            coupon::coupon_routes().merge(redemption::redemption_routes()),
        )
        .nest("/campaigns", campaign::campaign_routes())
        .nest("/orders", order::order_routes())
        .nest("/usage", coupon::usage_routes())
        .layer(from_fn_with_state(verifier, middleware::auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}
