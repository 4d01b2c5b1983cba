//! Limit checks against stored counts.

use std::sync::Arc;

use tracing::debug;

use remlic_core::result::AppResult;
use remlic_core::types::UserId;
use remlic_database::store::{LicenseStore, ProfileStore};
use remlic_entity::license::LicenseType;
use remlic_entity::user::Tier;

use super::engine::{self, LimitCheck};
use crate::context::RequestContext;

/// Resolves a user's tier and record counts and applies the limit engine.
#[derive(Clone)]
pub struct LimitService {
    licenses: Arc<dyn LicenseStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl LimitService {
    /// Creates a new limit service.
    pub fn new(licenses: Arc<dyn LicenseStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { licenses, profiles }
    }

    /// The user's tier; users without a profile are free.
    pub async fn tier_for(&self, user_id: UserId) -> AppResult<Tier> {
        Ok(self
            .profiles
            .find(user_id)
            .await?
            .map(|p| p.tier())
            .unwrap_or_default())
    }

    /// Check a raw type name for the caller. Unknown types are not counted.
    pub async fn check(&self, ctx: &RequestContext, license_type: &str) -> AppResult<LimitCheck> {
        let tier = self.tier_for(ctx.user_id).await?;
        let count = match LicenseType::parse(license_type) {
            Some(kind) => self.licenses.count(ctx.user_id, kind).await?,
            None => 0,
        };
        Ok(engine::can_add(Some(tier.as_str()), license_type, count))
    }

    /// Fail with `LimitExceeded` unless the caller may add another `kind`.
    pub async fn ensure_can_add(
        &self,
        ctx: &RequestContext,
        kind: LicenseType,
    ) -> AppResult<LimitCheck> {
        let tier = self.tier_for(ctx.user_id).await?;
        let count = self.licenses.count(ctx.user_id, kind).await?;
        let result = engine::check(tier, kind, count);
        debug!(
            user_id = %ctx.user_id,
            license_type = %kind,
            tier = %tier,
            count,
            allowed = result.allowed,
            "Limit check"
        );
        result.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remlic_core::error::ErrorKind;
    use remlic_database::MemoryStore;
    use remlic_entity::license::NewLicense;
    use remlic_entity::user::Profile;

    fn service(store: &MemoryStore) -> LimitService {
        LimitService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    async fn add(store: &MemoryStore, user: UserId, kind: LicenseType) {
        store
            .insert(
                user,
                NewLicense {
                    kind,
                    expiry_date: None,
                    fields: Default::default(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_user_without_profile_is_free() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let svc = service(&store);

        assert!(svc.ensure_can_add(&ctx, LicenseType::Drivers).await.is_ok());
        add(&store, ctx.user_id, LicenseType::Drivers).await;

        let err = svc
            .ensure_can_add(&ctx, LicenseType::Drivers)
            .await
            .expect_err("limit");
        assert_eq!(err.kind, ErrorKind::LimitExceeded);
        assert_eq!(err.message, "License limit (1) reached for your free tier");
    }

    #[tokio::test]
    async fn test_check_uses_profile_tier() {
        let store = MemoryStore::new();
        let ctx = RequestContext::new(UserId::new());
        let mut profile = Profile::new(ctx.user_id);
        profile.type_of_user = Some("standard".into());
        store.put_profile(profile);
        add(&store, ctx.user_id, LicenseType::Psira).await;

        let result = service(&store).check(&ctx, "psira").await.unwrap();
        assert!(result.allowed);
        assert_eq!(result.current_count, 1);
        assert_eq!(result.remaining, Some(7));

        let unknown = service(&store).check(&ctx, "boats").await.unwrap();
        assert!(!unknown.allowed);
    }
}
