//! Profile repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use remlic_core::error::{AppError, ErrorKind};
use remlic_core::result::AppResult;
use remlic_core::types::{LicenseId, UserId};
use remlic_entity::license::LicenseType;
use remlic_entity::user::profile::{STATUS_ACTIVE, STATUS_EXPIRED, TYPE_REGISTERED};
use remlic_entity::user::reminder::REMINDER_MESSAGE_PREFIX;
use remlic_entity::user::{Profile, ReminderSetting};

use super::row::{REMINDER_SETTINGS_QUERY, reminder_setting_from_row};
use crate::store::ProfileStore;

/// Repository over `profiles`, `license_type_settings` and `notifications`.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn find(&self, user_id: UserId) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, type_of_user, subscription_status, subscription_end_date \
             FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))
    }

    async fn list_with_end_date(&self) -> AppResult<Vec<Profile>> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, type_of_user, subscription_status, subscription_end_date \
             FROM profiles WHERE subscription_end_date IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list profiles", e))
    }

    async fn mark_expired(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            "UPDATE profiles SET type_of_user = $1, subscription_status = $2 WHERE id = $3",
        )
        .bind(TYPE_REGISTERED)
        .bind(STATUS_EXPIRED)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to expire subscription", e)
        })?;
        Ok(())
    }

    async fn list_active(&self) -> AppResult<Vec<Profile>> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, type_of_user, subscription_status, subscription_end_date \
             FROM profiles WHERE subscription_status = $1",
        )
        .bind(STATUS_ACTIVE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active profiles", e)
        })
    }

    async fn reminder_settings(&self, user_id: UserId) -> AppResult<Vec<ReminderSetting>> {
        let rows: Vec<Value> = sqlx::query_scalar(REMINDER_SETTINGS_QUERY)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load reminder settings", e)
            })?;

        Ok(rows.iter().filter_map(reminder_setting_from_row).collect())
    }

    async fn last_reminder_at(&self, user_id: UserId) -> AppResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM notifications \
             WHERE user_id = $1 AND message LIKE $2 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(format!("{REMINDER_MESSAGE_PREFIX}%"))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load last reminder", e)
        })
    }

    async fn record_reminder(
        &self,
        user_id: UserId,
        kind: LicenseType,
        license_id: LicenseId,
        message: &str,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (user_id, license_type, license_id, message, read) \
             VALUES ($1, $2, $3, $4, false)",
        )
        .bind(user_id)
        .bind(kind.table())
        .bind(license_id)
        .bind(message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record reminder", e)
        })?;
        Ok(())
    }
}
