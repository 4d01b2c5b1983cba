//! In-memory store backed by `dashmap`.
//!
//! Used when `database.provider = "memory"` and throughout the test suites.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;

use remlic_core::result::AppResult;
use remlic_core::types::{LicenseId, UserId};
use remlic_entity::license::{LicenseRecord, LicenseType, NewLicense};
use remlic_entity::user::profile::{STATUS_ACTIVE, STATUS_EXPIRED, TYPE_REGISTERED};
use remlic_entity::user::reminder::REMINDER_MESSAGE_PREFIX;
use remlic_entity::user::{Profile, ReminderSetting};

use crate::store::{LicenseStore, ProfileStore};

/// A row of the in-memory `notifications` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNotification {
    pub license_type: LicenseType,
    pub license_id: LicenseId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Process-local store implementing every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<LicenseId, LicenseRecord>>,
    profiles: Arc<DashMap<UserId, Profile>>,
    settings: Arc<DashMap<UserId, Vec<ReminderSetting>>>,
    notifications: Arc<DashMap<UserId, Vec<StoredNotification>>>,
    count_latency: Option<Duration>,
    list_latency: Option<Duration>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every `list` call, to exercise concurrent dashboard loads.
    pub fn with_list_latency(mut self, latency: Duration) -> Self {
        self.list_latency = Some(latency);
        self
    }

    /// Delay every `count` call, to exercise concurrent creates.
    pub fn with_count_latency(mut self, latency: Duration) -> Self {
        self.count_latency = Some(latency);
        self
    }

    /// Insert or replace a profile.
    pub fn put_profile(&self, profile: Profile) {
        self.profiles.insert(profile.id, profile);
    }

    /// Insert or replace a record as-is, keeping its timestamps.
    pub fn put_record(&self, record: LicenseRecord) {
        self.records.insert(record.id, record);
    }

    /// Replace a user's reminder settings.
    pub fn put_reminder_settings(&self, user_id: UserId, settings: Vec<ReminderSetting>) {
        self.settings.insert(user_id, settings);
    }

    /// Append a notification as-is.
    pub fn put_notification(&self, user_id: UserId, notification: StoredNotification) {
        self.notifications.entry(user_id).or_default().push(notification);
    }

    /// A user's notifications, oldest first.
    pub fn notifications(&self, user_id: UserId) -> Vec<StoredNotification> {
        self.notifications
            .get(&user_id)
            .map(|n| n.value().clone())
            .unwrap_or_default()
    }

    fn collect(&self, filter: impl Fn(&LicenseRecord) -> bool) -> Vec<LicenseRecord> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|r| (r.created_at, r.id));
        records
    }

    fn update_owned(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
        apply: impl FnOnce(&mut LicenseRecord),
    ) -> bool {
        match self.records.get_mut(&id) {
            Some(mut entry) if entry.user_id == user_id && entry.kind == kind => {
                apply(&mut entry);
                entry.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl LicenseStore for MemoryStore {
    async fn list(&self, user_id: UserId, kind: LicenseType) -> AppResult<Vec<LicenseRecord>> {
        if let Some(latency) = self.list_latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.collect(|r| r.user_id == user_id && r.kind == kind))
    }

    async fn count(&self, user_id: UserId, kind: LicenseType) -> AppResult<u32> {
        if let Some(latency) = self.count_latency {
            tokio::time::sleep(latency).await;
        }
        let count = self
            .records
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.kind == kind)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn find(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
    ) -> AppResult<Option<LicenseRecord>> {
        Ok(self
            .records
            .get(&id)
            .filter(|r| r.user_id == user_id && r.kind == kind)
            .map(|r| r.value().clone()))
    }

    async fn insert(&self, user_id: UserId, new: NewLicense) -> AppResult<LicenseRecord> {
        let record = LicenseRecord::from_new(user_id, new, Utc::now());
        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_expiry(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
        expiry: NaiveDate,
    ) -> AppResult<bool> {
        Ok(self.update_owned(user_id, kind, id, |r| r.expiry_date = Some(expiry)))
    }

    async fn set_paused(
        &self,
        user_id: UserId,
        kind: LicenseType,
        id: LicenseId,
        paused: bool,
    ) -> AppResult<bool> {
        Ok(self.update_owned(user_id, kind, id, |r| r.notifications_paused = paused))
    }

    async fn delete(&self, user_id: UserId, kind: LicenseType, id: LicenseId) -> AppResult<bool> {
        Ok(self
            .records
            .remove_if(&id, |_, r| r.user_id == user_id && r.kind == kind)
            .is_some())
    }

    async fn list_all(&self, kind: LicenseType) -> AppResult<Vec<LicenseRecord>> {
        Ok(self.collect(|r| r.kind == kind))
    }

    async fn resume_paused_before(
        &self,
        kind: LicenseType,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let now = Utc::now();
        let mut resumed = 0;
        for mut entry in self.records.iter_mut() {
            if entry.kind == kind && entry.notifications_paused && entry.updated_at < cutoff {
                entry.notifications_paused = false;
                entry.updated_at = now;
                resumed += 1;
            }
        }
        Ok(resumed)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find(&self, user_id: UserId) -> AppResult<Option<Profile>> {
        Ok(self.profiles.get(&user_id).map(|p| p.value().clone()))
    }

    async fn list_with_end_date(&self) -> AppResult<Vec<Profile>> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.subscription_end_date.is_some())
            .map(|p| p.value().clone())
            .collect())
    }

    async fn mark_expired(&self, user_id: UserId) -> AppResult<()> {
        if let Some(mut profile) = self.profiles.get_mut(&user_id) {
            profile.type_of_user = Some(TYPE_REGISTERED.to_string());
            profile.subscription_status = Some(STATUS_EXPIRED.to_string());
        }
        Ok(())
    }

    async fn list_active(&self) -> AppResult<Vec<Profile>> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.subscription_status.as_deref() == Some(STATUS_ACTIVE))
            .map(|p| p.value().clone())
            .collect())
    }

    async fn reminder_settings(&self, user_id: UserId) -> AppResult<Vec<ReminderSetting>> {
        Ok(self
            .settings
            .get(&user_id)
            .map(|s| s.value().clone())
            .unwrap_or_default())
    }

    async fn last_reminder_at(&self, user_id: UserId) -> AppResult<Option<DateTime<Utc>>> {
        Ok(self.notifications.get(&user_id).and_then(|n| {
            n.iter()
                .filter(|n| n.message.starts_with(REMINDER_MESSAGE_PREFIX))
                .map(|n| n.created_at)
                .max()
        }))
    }

    async fn record_reminder(
        &self,
        user_id: UserId,
        kind: LicenseType,
        license_id: LicenseId,
        message: &str,
    ) -> AppResult<()> {
        self.put_notification(
            user_id,
            StoredNotification {
                license_type: kind,
                license_id,
                message: message.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn new_license(kind: LicenseType, fields: Value) -> NewLicense {
        NewLicense {
            kind,
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            fields: fields.as_object().cloned().unwrap_or_else(Map::new),
        }
    }

    #[tokio::test]
    async fn test_records_are_scoped_by_owner_and_type() {
        let store = MemoryStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let record = store
            .insert(alice, new_license(LicenseType::Drivers, json!({"first_name": "A"})))
            .await
            .unwrap();

        assert_eq!(store.count(alice, LicenseType::Drivers).await.unwrap(), 1);
        assert_eq!(store.count(bob, LicenseType::Drivers).await.unwrap(), 0);
        assert_eq!(store.count(alice, LicenseType::Vehicles).await.unwrap(), 0);

        assert!(LicenseStore::find(&store, bob, LicenseType::Drivers, record.id)
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(bob, LicenseType::Drivers, record.id).await.unwrap());
        assert!(!store.delete(alice, LicenseType::Prpds, record.id).await.unwrap());
        assert!(store.delete(alice, LicenseType::Drivers, record.id).await.unwrap());
        assert_eq!(store.count(alice, LicenseType::Drivers).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_expiry_and_pause() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let record = store
            .insert(user, new_license(LicenseType::Vehicles, json!({"make": "VW"})))
            .await
            .unwrap();

        let renewed = NaiveDate::from_ymd_opt(2027, 1, 31).unwrap();
        assert!(store
            .update_expiry(user, LicenseType::Vehicles, record.id, renewed)
            .await
            .unwrap());
        assert!(store
            .set_paused(user, LicenseType::Vehicles, record.id, true)
            .await
            .unwrap());

        let stored = LicenseStore::find(&store, user, LicenseType::Vehicles, record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.expiry_date, Some(renewed));
        assert!(stored.notifications_paused);
    }

    #[tokio::test]
    async fn test_resume_paused_before_cutoff() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let mut stale = LicenseRecord::from_new(
            user,
            new_license(LicenseType::Works, json!({})),
            Utc::now() - chrono::Duration::days(10),
        );
        stale.notifications_paused = true;
        let mut fresh = stale.clone();
        fresh.id = LicenseId::new();
        fresh.updated_at = Utc::now();
        store.put_record(stale.clone());
        store.put_record(fresh.clone());

        let cutoff = Utc::now() - chrono::Duration::days(5);
        assert_eq!(store.resume_paused_before(LicenseType::Works, cutoff).await.unwrap(), 1);

        let records = store.list(user, LicenseType::Works).await.unwrap();
        let stale_now = records.iter().find(|r| r.id == stale.id).unwrap();
        let fresh_now = records.iter().find(|r| r.id == fresh.id).unwrap();
        assert!(!stale_now.notifications_paused);
        assert!(fresh_now.notifications_paused);
    }

    #[tokio::test]
    async fn test_mark_expired() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let mut profile = Profile::new(user);
        profile.type_of_user = Some("standard".into());
        profile.subscription_status = Some("active".into());
        store.put_profile(profile);

        store.mark_expired(user).await.unwrap();
        let profile = ProfileStore::find(&store, user).await.unwrap().unwrap();
        assert_eq!(profile.type_of_user.as_deref(), Some("registered"));
        assert_eq!(profile.subscription_status.as_deref(), Some("expired"));
    }

    #[tokio::test]
    async fn test_last_reminder_ignores_other_notifications() {
        let store = MemoryStore::new();
        let user = UserId::new();
        assert!(store.last_reminder_at(user).await.unwrap().is_none());

        let earlier = Utc::now() - chrono::Duration::days(3);
        store.put_notification(
            user,
            StoredNotification {
                license_type: LicenseType::Drivers,
                license_id: LicenseId::new(),
                message: "License expiring in 3 days (on 2025-06-04)".into(),
                created_at: earlier,
            },
        );
        store.put_notification(
            user,
            StoredNotification {
                license_type: LicenseType::Drivers,
                license_id: LicenseId::new(),
                message: "Notifications paused until 2025-06-06".into(),
                created_at: Utc::now(),
            },
        );

        assert_eq!(store.last_reminder_at(user).await.unwrap(), Some(earlier));
    }

    #[tokio::test]
    async fn test_list_active_filters_status() {
        let store = MemoryStore::new();
        let mut active = Profile::new(UserId::new());
        active.subscription_status = Some("active".into());
        let mut expired = Profile::new(UserId::new());
        expired.subscription_status = Some("expired".into());
        store.put_profile(active.clone());
        store.put_profile(expired);
        store.put_profile(Profile::new(UserId::new()));

        let listed = store.list_active().await.unwrap();
        assert_eq!(listed, vec![active]);
    }
}
