//! PostgreSQL implementation of OrderRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::coupon::CouponCode;
use crate::domain::foundation::{
    CouponId, DomainError, ErrorCode, OrderId, Timestamp, UserId,
};
use crate::domain::order::{Order, OrderStatus};
use crate::ports::{OrderRepository, Page};

use super::money_from_db;

const ORDER_COLUMNS: &str = "id, user_id, total_amount, discount_amount, final_amount, \
     status, coupon_code, coupon_id, created_at, updated_at";

/// PostgreSQL implementation of the OrderRepository port.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgresOrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    total_amount: i64,
    discount_amount: i64,
    final_amount: i64,
    status: String,
    coupon_code: Option<String>,
    coupon_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let coupon_code = row
            .coupon_code
            .as_deref()
            .map(CouponCode::try_new)
            .transpose()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid stored coupon code on order: {}", e),
                )
            })?;

        Ok(Order {
            id: OrderId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            total: money_from_db(row.total_amount, "total_amount")?,
            discount: money_from_db(row.discount_amount, "discount_amount")?,
            final_amount: money_from_db(row.final_amount, "final_amount")?,
            status: parse_status(&row.status)?,
            coupon_code,
            coupon_id: row.coupon_id.map(CouponId::from_uuid),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, DomainError> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "accepted" => Ok(OrderStatus::Accepted),
        "rejected" => Ok(OrderStatus::Rejected),
        "completed" => Ok(OrderStatus::Completed),
        "cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid order status value: {}", s),
        )),
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, total_amount, discount_amount, final_amount,
                status, coupon_code, coupon_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.total.cents())
        .bind(order.discount.cents())
        .bind(order.final_amount.cents())
        .bind(order.status.as_str())
        .bind(order.coupon_code.as_ref().map(|c| c.as_str()))
        .bind(order.coupon_id.map(|id| *id.as_uuid()))
        .bind(order.created_at.as_datetime())
        .bind(order.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert order", e))?;

        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        // total_amount is immutable after creation
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                discount_amount = $2,
                final_amount = $3,
                status = $4,
                coupon_code = $5,
                coupon_id = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.discount.cents())
        .bind(order.final_amount.cents())
        .bind(order.status.as_str())
        .bind(order.coupon_code.as_ref().map(|c| c.as_str()))
        .bind(order.coupon_id.map(|id| *id.as_uuid()))
        .bind(order.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update order", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::OrderNotFound, "Order not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch order", e))?;

        row.map(Order::try_from).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        page: Page,
    ) -> Result<(Vec<Order>, u64), DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count orders", e))?;

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            ORDER_COLUMNS
        ))
        .bind(user_id.as_uuid())
        .bind(page.size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list orders", e))?;

        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((orders, total as u64))
    }

    async fn list_all(&self, page: Page) -> Result<(Vec<Order>, u64), DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count orders", e))?;

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM orders
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
            ORDER_COLUMNS
        ))
        .bind(page.size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list orders", e))?;

        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((orders, total as u64))
    }
}
