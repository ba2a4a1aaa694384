//! PostgreSQL implementation of UsageLog.
//!
//! Append-only table; there is intentionally no UPDATE or DELETE here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::coupon::CouponCode;
use crate::domain::foundation::{
    CouponId, DomainError, ErrorCode, Money, OrderId, Timestamp, UsageRecordId, UserId,
};
use crate::domain::usage::{UsageRecord, UsageStats};
use crate::ports::{Page, UsageFilter, UsageLog};

use super::money_from_db;

const USAGE_COLUMNS: &str = "id, coupon_id, coupon_code, user_id, order_id, \
     original_amount, discount_amount, final_amount, used_at";

/// PostgreSQL implementation of the UsageLog port.
pub struct PostgresUsageLog {
    pool: PgPool,
}

impl PostgresUsageLog {
    /// Creates a new PostgresUsageLog with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a usage record.
#[derive(Debug, sqlx::FromRow)]
struct UsageRow {
    id: Uuid,
    coupon_id: Uuid,
    coupon_code: String,
    user_id: Uuid,
    order_id: Uuid,
    original_amount: i64,
    discount_amount: i64,
    final_amount: i64,
    used_at: DateTime<Utc>,
}

impl TryFrom<UsageRow> for UsageRecord {
    type Error = DomainError;

    fn try_from(row: UsageRow) -> Result<Self, Self::Error> {
        let coupon_code = CouponCode::try_new(&row.coupon_code).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored coupon code on usage record: {}", e),
            )
        })?;

        Ok(UsageRecord {
            id: UsageRecordId::from_uuid(row.id),
            coupon_id: CouponId::from_uuid(row.coupon_id),
            coupon_code,
            user_id: UserId::from_uuid(row.user_id),
            order_id: OrderId::from_uuid(row.order_id),
            original_amount: money_from_db(row.original_amount, "original_amount")?,
            discount_amount: money_from_db(row.discount_amount, "discount_amount")?,
            final_amount: money_from_db(row.final_amount, "final_amount")?,
            used_at: Timestamp::from_datetime(row.used_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl UsageLog for PostgresUsageLog {
    async fn append(&self, record: &UsageRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO usage_records (
                id, coupon_id, coupon_code, user_id, order_id,
                original_amount, discount_amount, final_amount, used_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.coupon_id.as_uuid())
        .bind(record.coupon_code.as_str())
        .bind(record.user_id.as_uuid())
        .bind(record.order_id.as_uuid())
        .bind(record.original_amount.cents())
        .bind(record.discount_amount.cents())
        .bind(record.final_amount.cents())
        .bind(record.used_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to append usage record", e))?;

        Ok(())
    }

    async fn count_for_user(
        &self,
        coupon_id: &CouponId,
        user_id: &UserId,
    ) -> Result<u32, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM usage_records WHERE coupon_id = $1 AND user_id = $2",
        )
        .bind(coupon_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count user redemptions", e))?;

        Ok(count as u32)
    }

    async fn list(
        &self,
        filter: UsageFilter,
        page: Page,
    ) -> Result<(Vec<UsageRecord>, u64), DomainError> {
        let coupon_id = filter.coupon_id.map(|id| *id.as_uuid());
        let user_id = filter.user_id.map(|id| *id.as_uuid());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM usage_records
            WHERE ($1::uuid IS NULL OR coupon_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            "#,
        )
        .bind(coupon_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count usage records", e))?;

        let rows: Vec<UsageRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM usage_records
            WHERE ($1::uuid IS NULL OR coupon_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
            ORDER BY used_at DESC
            LIMIT $3 OFFSET $4
            "#,
            USAGE_COLUMNS
        ))
        .bind(coupon_id)
        .bind(user_id)
        .bind(page.size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list usage records", e))?;

        let records = rows
            .into_iter()
            .map(UsageRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((records, total as u64))
    }

    async fn stats(&self, coupon_id: &CouponId) -> Result<UsageStats, DomainError> {
        let (total_usage, total_discount, total_revenue): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(discount_amount), 0)::bigint,
                   COALESCE(SUM(final_amount), 0)::bigint
            FROM usage_records
            WHERE coupon_id = $1
            "#,
        )
        .bind(coupon_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to aggregate usage stats", e))?;

        if total_usage == 0 {
            return Ok(UsageStats::default());
        }

        let average = total_discount / total_usage;
        Ok(UsageStats {
            total_usage: total_usage as u64,
            total_discount: money_from_db(total_discount, "total_discount")?,
            total_revenue: money_from_db(total_revenue, "total_revenue")?,
            average_discount: Money::from_cents(average).unwrap_or(Money::ZERO),
        })
    }
}
