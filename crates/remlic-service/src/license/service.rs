//! License record orchestration.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use remlic_core::error::AppError;
use remlic_core::result::AppResult;
use remlic_core::types::{LicenseId, UserId};
use remlic_database::store::LicenseStore;
use remlic_entity::license::{LicenseRecord, LicenseType, NewLicense};

use super::renewal::parse_renewal_date;
use crate::context::RequestContext;
use crate::dashboard::{DashboardService, TypeEntry};
use crate::limit::{LimitCheck, LimitService};

/// Result of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOutcome {
    pub record: LicenseRecord,
    /// The limit state before the insert.
    pub limit: LimitCheck,
}

/// Result of a pause toggle.
#[derive(Debug, Clone, Serialize)]
pub struct PauseOutcome {
    pub id: LicenseId,
    pub notifications_paused: bool,
}

/// Per `(user, type)` locks held across the limit check and the insert.
type CreateLocks = DashMap<(UserId, LicenseType), Arc<Mutex<()>>>;

/// A claim on one `(user, type)` create lock. The map entry is removed on
/// drop once no other create is waiting on it.
struct CreateSlot<'a> {
    locks: &'a CreateLocks,
    key: (UserId, LicenseType),
    lock: Option<Arc<Mutex<()>>>,
}

impl<'a> CreateSlot<'a> {
    fn claim(locks: &'a CreateLocks, key: (UserId, LicenseType)) -> Self {
        let lock = locks.entry(key).or_default().clone();
        Self {
            locks,
            key,
            lock: Some(lock),
        }
    }

    async fn acquire(&self) -> Option<MutexGuard<'_, ()>> {
        let lock = self.lock.as_ref()?;
        Some(lock.lock().await)
    }
}

impl Drop for CreateSlot<'_> {
    fn drop(&mut self) {
        self.lock.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Create, renew, pause and delete records in their type's table.
#[derive(Clone)]
pub struct LicenseService {
    licenses: Arc<dyn LicenseStore>,
    limits: Arc<LimitService>,
    dashboard: Arc<DashboardService>,
    create_locks: Arc<CreateLocks>,
}

impl LicenseService {
    /// Creates a new license service.
    pub fn new(
        licenses: Arc<dyn LicenseStore>,
        limits: Arc<LimitService>,
        dashboard: Arc<DashboardService>,
    ) -> Self {
        Self {
            licenses,
            limits,
            dashboard,
            create_locks: Arc::new(DashMap::new()),
        }
    }

    /// Validate and insert a record, subject to the caller's tier limit.
    ///
    /// Creates for the same user and type are serialised so concurrent
    /// requests cannot all pass the count check.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        kind: LicenseType,
        expiry_date: Option<&str>,
        mut fields: Map<String, Value>,
    ) -> AppResult<CreateOutcome> {
        let expiry_date = expiry_date
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_renewal_date)
            .transpose()?;

        for reserved in remlic_entity::license::model::RESERVED_COLUMNS {
            fields.remove(*reserved);
        }

        let new = NewLicense {
            kind,
            expiry_date,
            fields,
        };
        let missing = new.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "Missing required fields for {}: {}",
                kind.display_name(),
                missing.join(", ")
            )));
        }

        let slot = CreateSlot::claim(&self.create_locks, (ctx.user_id, kind));
        let _guard = slot.acquire().await;
        let limit = self.limits.ensure_can_add(ctx, kind).await?;
        let record = self.licenses.insert(ctx.user_id, new).await?;

        info!(
            user_id = %ctx.user_id,
            license_type = %kind,
            license_id = %record.id,
            "License created"
        );
        Ok(CreateOutcome { record, limit })
    }

    /// Replace the expiry date and return the refreshed dashboard entry.
    pub async fn renew(
        &self,
        ctx: &RequestContext,
        kind: LicenseType,
        id: LicenseId,
        expiry_date: &str,
    ) -> AppResult<TypeEntry> {
        let expiry = parse_renewal_date(expiry_date)?;
        if !self
            .licenses
            .update_expiry(ctx.user_id, kind, id, expiry)
            .await?
        {
            return Err(not_found(kind));
        }

        info!(
            user_id = %ctx.user_id,
            license_type = %kind,
            license_id = %id,
            table = kind.table(),
            expiry = %expiry,
            "License renewed"
        );
        self.dashboard.entry(ctx, kind).await
    }

    /// Toggle reminders. Pausing active reminders must be confirmed.
    pub async fn set_paused(
        &self,
        ctx: &RequestContext,
        kind: LicenseType,
        id: LicenseId,
        paused: bool,
        confirmed: bool,
    ) -> AppResult<PauseOutcome> {
        let record = self
            .licenses
            .find(ctx.user_id, kind, id)
            .await?
            .ok_or_else(|| not_found(kind))?;

        if paused && !record.notifications_paused && !confirmed {
            return Err(AppError::confirmation_required(format!(
                "Pausing notifications for this {} must be confirmed",
                kind.display_name()
            )));
        }

        if record.notifications_paused != paused
            && !self.licenses.set_paused(ctx.user_id, kind, id, paused).await?
        {
            return Err(not_found(kind));
        }

        info!(
            user_id = %ctx.user_id,
            license_type = %kind,
            license_id = %id,
            paused,
            "Notification state changed"
        );
        Ok(PauseOutcome {
            id,
            notifications_paused: paused,
        })
    }

    /// Permanently delete a record. Must be confirmed.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        kind: LicenseType,
        id: LicenseId,
        confirmed: bool,
    ) -> AppResult<()> {
        if !confirmed {
            return Err(AppError::confirmation_required(format!(
                "Deleting this {} must be confirmed",
                kind.display_name()
            )));
        }

        if !self.licenses.delete(ctx.user_id, kind, id).await? {
            return Err(not_found(kind));
        }

        info!(
            user_id = %ctx.user_id,
            license_type = %kind,
            license_id = %id,
            "License deleted"
        );
        Ok(())
    }
}

fn not_found(kind: LicenseType) -> AppError {
    AppError::not_found(format!("{} not found", capitalize(kind.display_name())))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use remlic_core::error::ErrorKind;
    use remlic_core::types::UserId;
    use remlic_database::MemoryStore;
    use remlic_entity::user::Profile;
    use serde_json::json;

    fn service(store: &MemoryStore) -> LicenseService {
        let licenses: Arc<dyn LicenseStore> = Arc::new(store.clone());
        let profiles = Arc::new(store.clone());
        LicenseService::new(
            licenses.clone(),
            Arc::new(LimitService::new(licenses.clone(), profiles.clone())),
            Arc::new(DashboardService::new(licenses, profiles)),
        )
    }

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn driver() -> Map<String, Value> {
        fields(json!({"first_name": "Lerato", "last_name": "Mokoena", "id_number": "9001015800087"}))
    }

    #[tokio::test]
    async fn test_create_validates_required_fields() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let err = service(&store)
            .create(&ctx, LicenseType::Drivers, None, fields(json!({"first_name": "L"})))
            .await
            .expect_err("missing fields");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("last_name, id_number"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_expiry() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let err = service(&store)
            .create(&ctx, LicenseType::Drivers, Some("2025-02-30"), driver())
            .await
            .expect_err("bad date");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_is_limit_gated() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let svc = service(&store);

        let outcome = svc
            .create(&ctx, LicenseType::Drivers, Some("2026-01-01"), driver())
            .await
            .unwrap();
        assert_eq!(outcome.limit.remaining, Some(1));
        assert_eq!(
            outcome.record.expiry_date,
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );

        let err = svc
            .create(&ctx, LicenseType::Drivers, None, driver())
            .await
            .expect_err("over limit");
        assert_eq!(err.kind, ErrorKind::LimitExceeded);
        assert_eq!(err.message, "License limit (1) reached for your free tier");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_respect_limit() {
        let store = MemoryStore::new().with_count_latency(std::time::Duration::from_millis(20));
        let ctx = RequestContext::new(UserId::new());
        let svc = service(&store);

        let attempts = (0..5).map(|_| {
            let svc = svc.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                svc.create(&ctx, LicenseType::Drivers, None, driver())
                    .await
                    .map(|_| ())
                    .map_err(|e| e.kind)
            })
        });
        let results: Vec<_> = futures::future::join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let created = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(created, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.err())
            .all(|kind| kind == ErrorKind::LimitExceeded));
        assert_eq!(store.count(ctx.user_id, LicenseType::Drivers).await.unwrap(), 1);
        assert!(svc.create_locks.is_empty());
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_owner() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let mut f = driver();
        f.insert("user_id".into(), json!(UserId::new().to_string()));
        let outcome = service(&store)
            .create(&ctx, LicenseType::Drivers, None, f)
            .await
            .unwrap();
        assert_eq!(outcome.record.user_id, ctx.user_id);
        assert!(!outcome.record.fields.contains_key("user_id"));
    }

    #[tokio::test]
    async fn test_renew_returns_refreshed_entry() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let svc = service(&store);
        let created = svc
            .create(&ctx, LicenseType::Prpds, Some("2020-01-01"), driver())
            .await
            .unwrap();

        let entry = svc
            .renew(&ctx, LicenseType::Prpds, created.record.id, "2099-12-31")
            .await
            .unwrap();
        assert_eq!(entry.license_type, LicenseType::Prpds);
        assert_eq!(entry.records.len(), 1);
        assert_eq!(
            entry.records[0].record.expiry_date,
            NaiveDate::from_ymd_opt(2099, 12, 31)
        );
        assert!(entry.records[0].status.is_valid);
    }

    #[tokio::test]
    async fn test_renew_someone_elses_record_is_not_found() {
        let store = MemoryStore::new();
        let owner = RequestContext::new(UserId::new());
        let svc = service(&store);
        let created = svc
            .create(&owner, LicenseType::Drivers, None, driver())
            .await
            .unwrap();

        let intruder = RequestContext::new(UserId::new());
        let err = svc
            .renew(&intruder, LicenseType::Drivers, created.record.id, "2030-01-01")
            .await
            .expect_err("not theirs");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_pause_requires_confirmation() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let svc = service(&store);
        let id = svc
            .create(&ctx, LicenseType::Drivers, None, driver())
            .await
            .unwrap()
            .record
            .id;

        let err = svc
            .set_paused(&ctx, LicenseType::Drivers, id, true, false)
            .await
            .expect_err("needs confirmation");
        assert_eq!(err.kind, ErrorKind::ConfirmationRequired);
        let stored = LicenseStore::find(&store, ctx.user_id, LicenseType::Drivers, id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.notifications_paused);

        let paused = svc
            .set_paused(&ctx, LicenseType::Drivers, id, true, true)
            .await
            .unwrap();
        assert!(paused.notifications_paused);

        let resumed = svc
            .set_paused(&ctx, LicenseType::Drivers, id, false, false)
            .await
            .unwrap();
        assert!(!resumed.notifications_paused);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let svc = service(&store);
        let id = svc
            .create(&ctx, LicenseType::Drivers, None, driver())
            .await
            .unwrap()
            .record
            .id;

        let err = svc
            .delete(&ctx, LicenseType::Drivers, id, false)
            .await
            .expect_err("needs confirmation");
        assert_eq!(err.kind, ErrorKind::ConfirmationRequired);

        svc.delete(&ctx, LicenseType::Drivers, id, true).await.unwrap();
        let err = svc
            .delete(&ctx, LicenseType::Drivers, id, true)
            .await
            .expect_err("gone");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Driver's license not found");
    }

    #[tokio::test]
    async fn test_downgrade_keeps_existing_records() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let mut profile = Profile::new(ctx.user_id);
        profile.type_of_user = Some("basic".into());
        store.put_profile(profile.clone());
        let svc = service(&store);
        for _ in 0..2 {
            svc.create(&ctx, LicenseType::Drivers, None, driver())
                .await
                .unwrap();
        }

        profile.type_of_user = Some("registered".into());
        store.put_profile(profile);
        let entry = DashboardService::new(Arc::new(store.clone()), Arc::new(store.clone()))
            .entry(&RequestContext::at(ctx.user_id, Utc::now()), LicenseType::Drivers)
            .await
            .unwrap();
        assert_eq!(entry.count, 2);
        assert_eq!(entry.limit, Some(1));
        assert!(entry.limit_reached);
    }
}
