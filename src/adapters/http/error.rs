//! Shared API error mapping.
//!
//! All application handlers speak `CouponError`; this module maps it to an
//! HTTP status and a stable machine-readable reason code once, so the route
//! handlers stay thin.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::coupon::CouponError;
use crate::domain::foundation::ErrorCode;

/// Standard error body for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable reason code.
    pub code: String,
    /// Human-readable message.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

/// Wrapper that turns a `CouponError` into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub CouponError);

impl From<CouponError> for ApiError {
    fn from(err: CouponError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::ValidationError> for ApiError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        Self(CouponError::ValidationFailed(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            CouponError::NotFound => (StatusCode::NOT_FOUND, "COUPON_NOT_FOUND".to_string()),
            CouponError::Rejected(reason) => (StatusCode::BAD_REQUEST, reason.code().to_string()),
            CouponError::UserLimitReached => {
                (StatusCode::BAD_REQUEST, "USER_LIMIT_REACHED".to_string())
            }
            CouponError::OrderNotFound => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND".to_string()),
            CouponError::OrderNotOwned => (StatusCode::FORBIDDEN, "ORDER_NOT_OWNED".to_string()),
            CouponError::OrderNotPending => {
                (StatusCode::CONFLICT, "ORDER_NOT_PENDING".to_string())
            }
            CouponError::DuplicateCode => {
                (StatusCode::CONFLICT, "DUPLICATE_COUPON_CODE".to_string())
            }
            CouponError::CampaignNotFound => {
                (StatusCode::NOT_FOUND, "CAMPAIGN_NOT_FOUND".to_string())
            }
            CouponError::ValidationFailed(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED".to_string())
            }
            // Unique-name conflicts ride the store error; everything else
            // there is a genuine infrastructure failure.
            CouponError::Store(inner) if inner.code == ErrorCode::DuplicateCampaignName => {
                (StatusCode::CONFLICT, "DUPLICATE_CAMPAIGN_NAME".to_string())
            }
            CouponError::Store(inner) => {
                tracing::error!(error = %inner, "request failed on storage");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("INTERNAL_ERROR", "Internal server error")),
                )
                    .into_response();
            }
        };

        let body = ErrorResponse::new(code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}
