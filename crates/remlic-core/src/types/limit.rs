//! Per-category record limits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How many records of one license type a user may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "max")]
pub enum LicenseLimit {
    /// At most this many records.
    Fixed(u32),
    /// No limit.
    Unlimited,
}

impl LicenseLimit {
    /// Whether a user already holding `current` records may add one more.
    pub fn allows_another(&self, current: u32) -> bool {
        match self {
            Self::Fixed(max) => current < *max,
            Self::Unlimited => true,
        }
    }

    /// Slots left before the limit is reached, `None` when unlimited.
    pub fn remaining(&self, current: u32) -> Option<u32> {
        match self {
            Self::Fixed(max) => Some(max.saturating_sub(current)),
            Self::Unlimited => None,
        }
    }

    /// The numeric cap, or `None` for unlimited.
    pub fn as_max(&self) -> Option<u32> {
        match self {
            Self::Fixed(max) => Some(*max),
            Self::Unlimited => None,
        }
    }
}

impl fmt::Display for LicenseLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(max) => write!(f, "{max}"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}
