//! Store traits consumed by the service layer.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use remlic_core::result::AppResult;
use remlic_core::types::{LicenseId, UserId};
use remlic_entity::license::{LicenseRecord, LicenseType, NewLicense};
use remlic_entity::user::{Profile, ReminderSetting};

/// Access to the per-type license tables.
///
/// Every user-scoped method filters on the owner, so a record belonging to
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait LicenseStore: Send + Sync + 'static {
    /// All of a user's records of one type, oldest first.
    async fn list(&self, user_id: UserId, kind: LicenseType) -> AppResult<Vec<LicenseRecord>>;

    /// How many records of one type a user holds.
    async fn count(&self, user_id: UserId, kind: LicenseType) -> AppResult<u32>;

    /// One of the user's records.
    async fn find(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
    ) -> AppResult<Option<LicenseRecord>>;

    /// Insert a record and return it as stored.
    async fn insert(&self, user_id: UserId, new: NewLicense) -> AppResult<LicenseRecord>;

    /// Replace the expiry date. Returns `false` if no such record.
    async fn update_expiry(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
        expiry: NaiveDate,
    ) -> AppResult<bool>;

    /// Set `notifications_paused`. Returns `false` if no such record.
    async fn set_paused(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
        paused: bool,
    ) -> AppResult<bool>;

    /// Delete a record. Returns `false` if no such record.
    async fn delete(&self, user_id: UserId, kind: LicenseType, id: LicenseId) -> AppResult<bool>;

    /// Every record of one type across all users.
    async fn list_all(&self, kind: LicenseType) -> AppResult<Vec<LicenseRecord>>;

    /// Un-pause records of one type last touched before `cutoff`.
    /// Returns how many were resumed.
    async fn resume_paused_before(
        &self,
        kind: LicenseType,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Verify the store is reachable.
    async fn health_check(&self) -> AppResult<()>;
}

/// Access to user profiles and reminder preferences.
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    /// A user's profile.
    async fn find(&self, user_id: UserId) -> AppResult<Option<Profile>>;

    /// Profiles that carry a subscription end date.
    async fn list_with_end_date(&self) -> AppResult<Vec<Profile>>;

    /// Downgrade a lapsed subscription to `registered` / `expired`.
    async fn mark_expired(&self, user_id: UserId) -> AppResult<()>;

    /// Profiles whose `subscription_status` is `active`.
    async fn list_active(&self) -> AppResult<Vec<Profile>>;

    /// A user's per-type reminder settings.
    async fn reminder_settings(&self, user_id: UserId) -> AppResult<Vec<ReminderSetting>>;

    /// When the user was last sent an expiry reminder, if ever.
    async fn last_reminder_at(&self, user_id: UserId) -> AppResult<Option<DateTime<Utc>>>;

    /// Append an expiry reminder to the user's notifications.
    async fn record_reminder(
        &self,
        user_id: UserId,
        kind: LicenseType,
        license_id: LicenseId,
        message: &str,
    ) -> AppResult<()>;
}
