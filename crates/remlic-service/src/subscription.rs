//! Subscription state and the lapsed-subscription sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use remlic_core::config::{BillingConfig, PlanCodes};
use remlic_core::result::AppResult;
use remlic_core::types::UserId;
use remlic_database::store::ProfileStore;
use remlic_entity::user::Tier;

/// Yearly and monthly plan codes for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierPlans<'a> {
    pub yearly: &'a str,
    pub monthly: &'a str,
}

/// Plan codes for a paid tier; `None` for free and admin.
pub fn plans_for(tier: Tier, plans: &PlanCodes) -> Option<TierPlans<'_>> {
    let (yearly, monthly) = match tier {
        Tier::Basic => (&plans.tier1, &plans.tier1_monthly),
        Tier::Standard => (&plans.tier2, &plans.tier2_monthly),
        Tier::Professional => (&plans.tier3, &plans.tier3_monthly),
        Tier::Advanced => (&plans.tier4, &plans.tier4_monthly),
        Tier::Premium => (&plans.premium, &plans.premium_monthly),
        Tier::Free | Tier::Admin => return None,
    };
    Some(TierPlans { yearly, monthly })
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Profiles with an end date that were examined.
    pub checked: usize,
    /// Users downgraded in this run.
    pub downgraded: Vec<UserId>,
    /// Users whose downgrade failed.
    pub failed: Vec<UserId>,
}

/// Subscription queries and maintenance.
#[derive(Clone)]
pub struct SubscriptionService {
    profiles: Arc<dyn ProfileStore>,
    billing: Arc<BillingConfig>,
}

impl SubscriptionService {
    /// Creates a new subscription service.
    pub fn new(profiles: Arc<dyn ProfileStore>, billing: Arc<BillingConfig>) -> Self {
        Self { profiles, billing }
    }

    /// Whether the user currently has an active subscription.
    pub async fn is_active(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<bool> {
        Ok(self
            .profiles
            .find(user_id)
            .await?
            .is_some_and(|p| p.has_active_subscription(now)))
    }

    /// Plan codes for a tier from configuration.
    pub fn plans(&self, tier: Tier) -> Option<TierPlans<'_>> {
        plans_for(tier, &self.billing.plans)
    }

    /// Downgrade every non-admin profile whose subscription has ended.
    ///
    /// A failure on one profile is logged and the sweep continues.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let profiles = self.profiles.list_with_end_date().await?;
        let mut report = SweepReport {
            checked: profiles.len(),
            ..Default::default()
        };

        for profile in profiles.into_iter().filter(|p| p.is_lapsed(now)) {
            match self.profiles.mark_expired(profile.id).await {
                Ok(()) => {
                    info!(
                        user_id = %profile.id,
                        previous_tier = profile.type_of_user.as_deref().unwrap_or("none"),
                        "Subscription expired; user downgraded"
                    );
                    report.downgraded.push(profile.id);
                }
                Err(e) => {
                    warn!(user_id = %profile.id, error = %e, "Failed to downgrade subscription");
                    report.failed.push(profile.id);
                }
            }
        }

        info!(
            checked = report.checked,
            downgraded = report.downgraded.len(),
            failed = report.failed.len(),
            "Subscription sweep complete"
        );
        Ok(report)
    }
}
