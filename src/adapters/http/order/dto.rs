//! JSON request/response types for order endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::ValidationError;
use crate::domain::order::{Order, OrderStatus};

use super::super::PageMeta;

/// Request to create a pending order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Order total in major units.
    pub total: f64,
}

/// Request to move an order through its status machine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

impl UpdateOrderStatusRequest {
    pub fn to_status(&self) -> Result<OrderStatus, ValidationError> {
        match self.status.as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "accepted" => Ok(OrderStatus::Accepted),
            "rejected" => Ok(OrderStatus::Rejected),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("Unknown order status '{}'", other),
            )),
        }
    }
}

/// Order view for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total: f64,
    pub discount: f64,
    pub final_amount: f64,
    pub status: String,
    pub coupon_code: Option<String>,
    pub coupon_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: *order.id.as_uuid(),
            user_id: *order.user_id.as_uuid(),
            total: order.total.as_major_units(),
            discount: order.discount.as_major_units(),
            final_amount: order.final_amount.as_major_units(),
            status: order.status.as_str().to_string(),
            coupon_code: order.coupon_code.map(|c| c.to_string()),
            coupon_id: order.coupon_id.map(|id| *id.as_uuid()),
            created_at: order.created_at.as_datetime().to_rfc3339(),
            updated_at: order.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Paginated order listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub pagination: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_request_parses_known_values() {
        let request = UpdateOrderStatusRequest {
            status: "accepted".to_string(),
        };
        assert_eq!(request.to_status().unwrap(), OrderStatus::Accepted);
    }

    #[test]
    fn status_request_rejects_unknown_value() {
        let request = UpdateOrderStatusRequest {
            status: "shipped".to_string(),
        };
        assert!(request.to_status().is_err());
    }
}
