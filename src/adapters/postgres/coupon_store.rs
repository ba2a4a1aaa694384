//! PostgreSQL implementation of CouponStore.
//!
//! The usage counter only moves through `reserve_usage` and
//! `release_usage`. The reservation is a single conditional
//! `UPDATE ... RETURNING`, so the cap predicate and the increment are one
//! atomic statement; Postgres row locking guarantees that under concurrent
//! redemptions exactly `max_usage` of them see a row come back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::coupon::{Coupon, CouponCode, Discount};
use crate::domain::foundation::{
    CampaignId, CouponId, DomainError, ErrorCode, Timestamp, UserId,
};
use crate::ports::{CouponFilter, CouponStore, Page};

use super::money_from_db;

const COUPON_COLUMNS: &str = "id, code, description, discount_type, discount_value, \
     discount_cap, min_purchase, start_at, expires_at, max_usage, current_usage, \
     user_max_usage, is_active, campaign_id, created_by, created_at, updated_at";

/// PostgreSQL implementation of the CouponStore port.
pub struct PostgresCouponStore {
    pool: PgPool,
}

impl PostgresCouponStore {
    /// Creates a new PostgresCouponStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a coupon.
#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: Uuid,
    code: String,
    description: Option<String>,
    discount_type: String,
    discount_value: i64,
    discount_cap: Option<i64>,
    min_purchase: i64,
    start_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    max_usage: Option<i32>,
    current_usage: i32,
    user_max_usage: i32,
    is_active: bool,
    campaign_id: Uuid,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = DomainError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let code = CouponCode::try_new(&row.code).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored coupon code: {}", e),
            )
        })?;
        let discount = parse_discount(&row.discount_type, row.discount_value, row.discount_cap)?;

        Ok(Coupon {
            id: CouponId::from_uuid(row.id),
            code,
            description: row.description,
            discount,
            min_purchase: money_from_db(row.min_purchase, "min_purchase")?,
            start_at: Timestamp::from_datetime(row.start_at),
            expires_at: Timestamp::from_datetime(row.expires_at),
            max_usage: row.max_usage.map(|v| v as u32),
            current_usage: row.current_usage.max(0) as u32,
            user_max_usage: row.user_max_usage.max(1) as u32,
            is_active: row.is_active,
            campaign_id: CampaignId::from_uuid(row.campaign_id),
            created_by: UserId::from_uuid(row.created_by),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_discount(
    kind: &str,
    value: i64,
    cap: Option<i64>,
) -> Result<Discount, DomainError> {
    match kind {
        "percentage" => {
            let cap = cap.map(|c| money_from_db(c, "discount_cap")).transpose()?;
            Discount::percentage(value as u32, cap).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid stored percentage discount: {}", e),
                )
            })
        }
        "fixed" => Ok(Discount::fixed(money_from_db(value, "discount_value")?)),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid discount type: {}", kind),
        )),
    }
}

/// Column values for a discount: (type, value, cap).
fn discount_to_columns(discount: &Discount) -> (&'static str, i64, Option<i64>) {
    match discount {
        Discount::Percentage { basis_points, cap } => (
            "percentage",
            *basis_points as i64,
            cap.map(|c| c.cents()),
        ),
        Discount::Fixed { amount } => ("fixed", amount.cents(), None),
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("{}: {}", context, e),
    )
}

#[async_trait]
impl CouponStore for PostgresCouponStore {
    async fn insert(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let (kind, value, cap) = discount_to_columns(&coupon.discount);

        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, code, description, discount_type, discount_value, discount_cap,
                min_purchase, start_at, expires_at, max_usage, current_usage,
                user_max_usage, is_active, campaign_id, created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(coupon.id.as_uuid())
        .bind(coupon.code.as_str())
        .bind(&coupon.description)
        .bind(kind)
        .bind(value)
        .bind(cap)
        .bind(coupon.min_purchase.cents())
        .bind(coupon.start_at.as_datetime())
        .bind(coupon.expires_at.as_datetime())
        .bind(coupon.max_usage.map(|v| v as i32))
        .bind(coupon.current_usage as i32)
        .bind(coupon.user_max_usage as i32)
        .bind(coupon.is_active)
        .bind(coupon.campaign_id.as_uuid())
        .bind(coupon.created_by.as_uuid())
        .bind(coupon.created_at.as_datetime())
        .bind(coupon.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("coupons_code_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateCouponCode,
                        "Coupon code already exists",
                    );
                }
            }
            db_error("Failed to insert coupon", e)
        })?;

        Ok(())
    }

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError> {
        let (kind, value, cap) = discount_to_columns(&coupon.discount);

        // current_usage deliberately absent: the counter only moves through
        // reserve_usage / release_usage
        let result = sqlx::query(
            r#"
            UPDATE coupons SET
                description = $2,
                discount_type = $3,
                discount_value = $4,
                discount_cap = $5,
                min_purchase = $6,
                start_at = $7,
                expires_at = $8,
                max_usage = $9,
                user_max_usage = $10,
                is_active = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(coupon.id.as_uuid())
        .bind(&coupon.description)
        .bind(kind)
        .bind(value)
        .bind(cap)
        .bind(coupon.min_purchase.cents())
        .bind(coupon.start_at.as_datetime())
        .bind(coupon.expires_at.as_datetime())
        .bind(coupon.max_usage.map(|v| v as i32))
        .bind(coupon.user_max_usage as i32)
        .bind(coupon.is_active)
        .bind(coupon.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update coupon", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::CouponNotFound, "Coupon not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        let row: Option<CouponRow> = sqlx::query_as(&format!(
            "SELECT {} FROM coupons WHERE id = $1",
            COUPON_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch coupon", e))?;

        row.map(Coupon::try_from).transpose()
    }

    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError> {
        let row: Option<CouponRow> = sqlx::query_as(&format!(
            "SELECT {} FROM coupons WHERE code = $1",
            COUPON_COLUMNS
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch coupon by code", e))?;

        row.map(Coupon::try_from).transpose()
    }

    async fn list(
        &self,
        filter: CouponFilter,
        page: Page,
    ) -> Result<(Vec<Coupon>, u64), DomainError> {
        let campaign_id = filter.campaign_id.map(|id| *id.as_uuid());
        let code = filter.code.map(|c| c.as_str().to_string());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM coupons
            WHERE ($1::uuid IS NULL OR campaign_id = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL OR code = $3)
            "#,
        )
        .bind(campaign_id)
        .bind(filter.is_active)
        .bind(&code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count coupons", e))?;

        let rows: Vec<CouponRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM coupons
            WHERE ($1::uuid IS NULL OR campaign_id = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
              AND ($3::text IS NULL OR code = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
            COUPON_COLUMNS
        ))
        .bind(campaign_id)
        .bind(filter.is_active)
        .bind(&code)
        .bind(page.size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list coupons", e))?;

        let coupons = rows
            .into_iter()
            .map(Coupon::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((coupons, total as u64))
    }

    async fn list_redeemable(&self, now: Timestamp) -> Result<Vec<Coupon>, DomainError> {
        let rows: Vec<CouponRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM coupons
            WHERE is_active
              AND start_at <= $1
              AND expires_at >= $1
              AND (max_usage IS NULL OR current_usage < max_usage)
            ORDER BY created_at DESC
            "#,
            COUPON_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list redeemable coupons", e))?;

        rows.into_iter().map(Coupon::try_from).collect()
    }

    async fn reserve_usage(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError> {
        // Predicate and increment in one statement. Two concurrent calls
        // serialize on the row lock; the second re-evaluates the predicate
        // against the incremented counter and misses if the cap is gone.
        let row: Option<CouponRow> = sqlx::query_as(&format!(
            r#"
            UPDATE coupons
            SET current_usage = current_usage + 1, updated_at = NOW()
            WHERE id = $1
              AND (max_usage IS NULL OR current_usage < max_usage)
            RETURNING {}
            "#,
            COUPON_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to reserve coupon usage", e))?;

        match row {
            Some(row) => Ok(Some(Coupon::try_from(row)?)),
            None => {
                // Distinguish "cap reached" from "coupon gone"
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM coupons WHERE id = $1)")
                        .bind(id.as_uuid())
                        .fetch_one(&self.pool)
                        .await
                        .map_err(|e| db_error("Failed to check coupon existence", e))?;
                if exists {
                    Ok(None)
                } else {
                    Err(DomainError::new(ErrorCode::CouponNotFound, "Coupon not found"))
                }
            }
        }
    }

    async fn release_usage(&self, id: &CouponId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE coupons
            SET current_usage = current_usage - 1, updated_at = NOW()
            WHERE id = $1 AND current_usage > 0
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to release coupon usage", e))?;

        Ok(())
    }

    async fn deactivate_for_campaign(&self, campaign_id: &CampaignId) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET is_active = FALSE, updated_at = NOW()
            WHERE campaign_id = $1 AND is_active
            "#,
        )
        .bind(campaign_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to deactivate campaign coupons", e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &CouponId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete coupon", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::CouponNotFound, "Coupon not found"));
        }
        Ok(())
    }
}
