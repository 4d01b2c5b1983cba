//! Subscription tiers and their per-category limits.

use std::fmt;

use serde::{Deserialize, Serialize};

use remlic_core::types::LicenseLimit;

use crate::license::LicenseType;

/// Subscription tier gating how many records a user may keep per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Basic,
    Standard,
    Professional,
    Advanced,
    Premium,
    Admin,
}

impl Tier {
    /// Paid tiers, cheapest first.
    pub const PAID: [Tier; 5] = [
        Self::Basic,
        Self::Standard,
        Self::Professional,
        Self::Advanced,
        Self::Premium,
    ];

    /// Resolve a profile's `type_of_user`. Absent or unknown values
    /// (including `registered`) are treated as free.
    pub fn from_profile(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("basic") => Self::Basic,
            Some("standard") => Self::Standard,
            Some("professional") => Self::Professional,
            Some("advanced") => Self::Advanced,
            Some("premium") => Self::Premium,
            Some("admin") => Self::Admin,
            _ => Self::Free,
        }
    }

    /// Lowercase name as stored in `type_of_user`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Professional => "professional",
            Self::Advanced => "advanced",
            Self::Premium => "premium",
            Self::Admin => "admin",
        }
    }

    /// Whether this tier bypasses every limit.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this tier is bought through a plan.
    pub fn is_paid(&self) -> bool {
        Self::PAID.contains(self)
    }

    /// How many records of `kind` this tier may hold.
    ///
    /// Each tier currently applies one limit to every type.
    pub fn limit_for(&self, _kind: LicenseType) -> LicenseLimit {
        match self {
            Self::Admin | Self::Premium => LicenseLimit::Unlimited,
            Self::Free => LicenseLimit::Fixed(1),
            Self::Basic => LicenseLimit::Fixed(2),
            Self::Standard => LicenseLimit::Fixed(8),
            Self::Professional => LicenseLimit::Fixed(12),
            Self::Advanced => LicenseLimit::Fixed(30),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_values_resolve_to_free() {
        assert_eq!(Tier::from_profile(None), Tier::Free);
        assert_eq!(Tier::from_profile(Some("registered")), Tier::Free);
        assert_eq!(Tier::from_profile(Some("gold")), Tier::Free);
        assert_eq!(Tier::from_profile(Some(" Premium ")), Tier::Premium);
    }

    #[test]
    fn test_free_limits() {
        for kind in LicenseType::ALL {
            assert_eq!(Tier::Free.limit_for(kind), LicenseLimit::Fixed(1), "{kind}");
        }
    }

    #[test]
    fn test_paid_limits_are_uniform() {
        for kind in LicenseType::ALL {
            assert_eq!(Tier::Basic.limit_for(kind), LicenseLimit::Fixed(2));
            assert_eq!(Tier::Standard.limit_for(kind), LicenseLimit::Fixed(8));
            assert_eq!(Tier::Professional.limit_for(kind), LicenseLimit::Fixed(12));
            assert_eq!(Tier::Advanced.limit_for(kind), LicenseLimit::Fixed(30));
            assert_eq!(Tier::Premium.limit_for(kind), LicenseLimit::Unlimited);
            assert_eq!(Tier::Admin.limit_for(kind), LicenseLimit::Unlimited);
        }
    }

    #[test]
    fn test_paid_membership() {
        assert!(Tier::Basic.is_paid());
        assert!(!Tier::Free.is_paid());
        assert!(!Tier::Admin.is_paid());
    }
}
