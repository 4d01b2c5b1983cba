//! User profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use remlic_core::types::UserId;

use super::tier::Tier;

/// Subscription status written when a subscription lapses.
pub const STATUS_EXPIRED: &str = "expired";
/// Subscription status of a paying user.
pub const STATUS_ACTIVE: &str = "active";
/// `type_of_user` written when a subscription lapses.
pub const TYPE_REGISTERED: &str = "registered";

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// The user this profile belongs to.
    pub id: UserId,
    /// Tier name as stored by billing.
    pub type_of_user: Option<String>,
    /// `active`, `expired`, ...
    pub subscription_status: Option<String>,
    /// When the current subscription period ends.
    pub subscription_end_date: Option<DateTime<Utc>>,
}

impl Profile {
    /// A profile with no subscription.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            type_of_user: None,
            subscription_status: None,
            subscription_end_date: None,
        }
    }

    /// The resolved tier.
    pub fn tier(&self) -> Tier {
        Tier::from_profile(self.type_of_user.as_deref())
    }

    /// Active iff the status is `active` and the period has not ended.
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        let active = self
            .subscription_status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(STATUS_ACTIVE));

        active && self.subscription_end_date.is_none_or(|end| end > now)
    }

    /// Whether the sweep should downgrade this profile.
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        !self.tier().is_admin() && self.subscription_end_date.is_some_and(|end| now > end)
    }
}
