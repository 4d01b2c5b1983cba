//! License table repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::PgPool;

use remlic_core::error::{AppError, ErrorKind};
use remlic_core::result::AppResult;
use remlic_core::types::{LicenseId, UserId};
use remlic_entity::license::{LicenseRecord, LicenseType, NewLicense};

use super::row::{record_from_row, row_from_record};
use crate::store::LicenseStore;

/// Repository over the ten per-type license tables.
///
/// Table and column names come only from [`LicenseType`]'s closed catalog.
#[derive(Debug, Clone)]
pub struct LicenseRepository {
    pool: PgPool,
}

impl LicenseRepository {
    /// Create a new license repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(
        &self,
        kind: LicenseType,
        user_id: Option<UserId>,
    ) -> AppResult<Vec<LicenseRecord>> {
        let sql = match user_id {
            Some(_) => format!(
                "SELECT to_jsonb(t) FROM {} t WHERE t.user_id = $1 ORDER BY t.created_at",
                kind.table()
            ),
            None => format!("SELECT to_jsonb(t) FROM {} t ORDER BY t.created_at", kind.table()),
        };

        let mut query = sqlx::query_scalar::<_, Value>(&sql);
        if let Some(user_id) = user_id {
            query = query.bind(user_id);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to list {}", kind.table()),
                    e,
                )
            })?
            .into_iter()
            .map(|row| record_from_row(kind, row))
            .collect()
    }
}

#[async_trait]
impl LicenseStore for LicenseRepository {
    async fn list(&self, user_id: UserId, kind: LicenseType) -> AppResult<Vec<LicenseRecord>> {
        self.fetch_rows(kind, Some(user_id)).await
    }

    async fn count(&self, user_id: UserId, kind: LicenseType) -> AppResult<u32> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", kind.table());
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to count {}", kind.table()),
                    e,
                )
            })?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn find(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
    ) -> AppResult<Option<LicenseRecord>> {
        let sql = format!(
            "SELECT to_jsonb(t) FROM {} t WHERE t.id = $1 AND t.user_id = $2",
            kind.table()
        );
        sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find license", e))?
            .map(|row| record_from_row(kind, row))
            .transpose()
    }

    async fn insert(&self, user_id: UserId, new: NewLicense) -> AppResult<LicenseRecord> {
        let kind = new.kind;
        let record = LicenseRecord::from_new(user_id, new, Utc::now());
        let sql = format!(
            "INSERT INTO {table} AS t SELECT * FROM jsonb_populate_record(NULL::{table}, $1) \
             RETURNING to_jsonb(t)",
            table = kind.table()
        );

        let row: Value = sqlx::query_scalar(&sql)
            .bind(row_from_record(&record))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to insert into {}", kind.table()),
                    e,
                )
            })?;

        record_from_row(kind, row)
    }

    async fn update_expiry(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
        expiry: NaiveDate,
    ) -> AppResult<bool> {
        let sql = format!(
            "UPDATE {} SET {} = $1::date, updated_at = NOW() WHERE id = $2 AND user_id = $3",
            kind.table(),
            kind.expiry_column()
        );
        let result = sqlx::query(&sql)
            .bind(expiry)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to renew license", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_paused(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
        paused: bool,
    ) -> AppResult<bool> {
        let sql = format!(
            "UPDATE {} SET notifications_paused = $1, updated_at = NOW() \
             WHERE id = $2 AND user_id = $3",
            kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(paused)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update notifications", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: UserId, kind: LicenseType, id: LicenseId) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete license", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self, kind: LicenseType) -> AppResult<Vec<LicenseRecord>> {
        self.fetch_rows(kind, None).await
    }

    async fn resume_paused_before(
        &self,
        kind: LicenseType,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let sql = format!(
            "UPDATE {} SET notifications_paused = FALSE, updated_at = NOW() \
             WHERE notifications_paused = TRUE AND updated_at < $1",
            kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to resume notifications", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
