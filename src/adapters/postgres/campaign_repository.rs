//! PostgreSQL implementation of CampaignRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::campaign::Campaign;
use crate::domain::foundation::{CampaignId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{CampaignRepository, Page};

/// PostgreSQL implementation of the CampaignRepository port.
pub struct PostgresCampaignRepository {
    pool: PgPool,
}

impl PostgresCampaignRepository {
    /// Creates a new PostgresCampaignRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a campaign.
#[derive(Debug, sqlx::FromRow)]
struct CampaignRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    is_active: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CampaignRow> for Campaign {
    fn from(row: CampaignRow) -> Self {
        Campaign {
            id: CampaignId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            start_at: Timestamp::from_datetime(row.start_at),
            end_at: Timestamp::from_datetime(row.end_at),
            is_active: row.is_active,
            created_by: UserId::from_uuid(row.created_by),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl CampaignRepository for PostgresCampaignRepository {
    async fn insert(&self, campaign: &Campaign) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (
                id, name, description, start_at, end_at, is_active,
                created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(campaign.id.as_uuid())
        .bind(&campaign.name)
        .bind(&campaign.description)
        .bind(campaign.start_at.as_datetime())
        .bind(campaign.end_at.as_datetime())
        .bind(campaign.is_active)
        .bind(campaign.created_by.as_uuid())
        .bind(campaign.created_at.as_datetime())
        .bind(campaign.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("campaigns_name_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateCampaignName,
                        "Campaign name already exists",
                    );
                }
            }
            db_error("Failed to insert campaign", e)
        })?;

        Ok(())
    }

    async fn update(&self, campaign: &Campaign) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE campaigns SET
                name = $2,
                description = $3,
                start_at = $4,
                end_at = $5,
                is_active = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(campaign.id.as_uuid())
        .bind(&campaign.name)
        .bind(&campaign.description)
        .bind(campaign.start_at.as_datetime())
        .bind(campaign.end_at.as_datetime())
        .bind(campaign.is_active)
        .bind(campaign.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("campaigns_name_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateCampaignName,
                        "Campaign name already exists",
                    );
                }
            }
            db_error("Failed to update campaign", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CampaignNotFound,
                "Campaign not found",
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CampaignId) -> Result<Option<Campaign>, DomainError> {
        let row: Option<CampaignRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, start_at, end_at, is_active,
                   created_by, created_at, updated_at
            FROM campaigns WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch campaign", e))?;

        Ok(row.map(Campaign::from))
    }

    async fn list(
        &self,
        is_active: Option<bool>,
        page: Page,
    ) -> Result<(Vec<Campaign>, u64), DomainError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM campaigns WHERE ($1::boolean IS NULL OR is_active = $1)",
        )
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count campaigns", e))?;

        let rows: Vec<CampaignRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, start_at, end_at, is_active,
                   created_by, created_at, updated_at
            FROM campaigns
            WHERE ($1::boolean IS NULL OR is_active = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(is_active)
        .bind(page.size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list campaigns", e))?;

        Ok((rows.into_iter().map(Campaign::from).collect(), total as u64))
    }

    async fn delete(&self, id: &CampaignId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete campaign", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CampaignNotFound,
                "Campaign not found",
            ));
        }
        Ok(())
    }
}
