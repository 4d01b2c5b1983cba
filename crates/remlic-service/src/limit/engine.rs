//! Pure limit decisions.

use serde::Serialize;

use remlic_core::error::AppError;
use remlic_core::types::LicenseLimit;
use remlic_entity::license::LicenseType;
use remlic_entity::user::Tier;

/// Outcome of asking whether one more record may be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimitCheck {
    /// Whether the add may proceed.
    pub allowed: bool,
    /// The applicable limit.
    pub limit: LicenseLimit,
    /// Records the user already holds of this type.
    pub current_count: u32,
    /// Slots left, `None` when unlimited.
    pub remaining: Option<u32>,
    /// The tier the decision was made for.
    pub tier: Tier,
}

impl LimitCheck {
    /// The blocking message, if the add is not allowed.
    pub fn message(&self) -> Option<String> {
        (!self.allowed).then(|| {
            format!(
                "License limit ({}) reached for your {} tier",
                self.limit, self.tier
            )
        })
    }

    /// `Ok(self)` when allowed, otherwise a limit-exceeded error.
    pub fn into_result(self) -> Result<Self, AppError> {
        match self.message() {
            None => Ok(self),
            Some(message) => Err(AppError::limit_exceeded(message)),
        }
    }
}

/// Decide for a known tier and type.
pub fn check(tier: Tier, kind: LicenseType, current_count: u32) -> LimitCheck {
    decide(tier, tier.limit_for(kind), current_count)
}

/// Decide from raw inputs. Unset or unknown tiers count as free; a type
/// that does not parse has a limit of zero for every tier but admin.
pub fn can_add(tier: Option<&str>, license_type: &str, current_count: u32) -> LimitCheck {
    let tier = Tier::from_profile(tier);
    let limit = match LicenseType::parse(license_type) {
        Some(kind) => tier.limit_for(kind),
        None if tier.is_admin() => LicenseLimit::Unlimited,
        None => LicenseLimit::Fixed(0),
    };
    decide(tier, limit, current_count)
}

fn decide(tier: Tier, limit: LicenseLimit, current_count: u32) -> LimitCheck {
    LimitCheck {
        allowed: limit.allows_another(current_count),
        limit,
        current_count,
        remaining: limit.remaining(current_count),
        tier,
    }
}
