//! Per-type reminder preferences.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::license::LicenseType;

/// Days-before window used when a setting row leaves it blank.
pub const DEFAULT_REMINDER_DAYS: i64 = 7;

/// Leading text of every expiry reminder notification.
pub const REMINDER_MESSAGE_PREFIX: &str = "License expiring";

/// Notification text for a reminder sent `days` before `expiry`.
pub fn reminder_message(days: i64, expiry: NaiveDate) -> String {
    format!(
        "{REMINDER_MESSAGE_PREFIX} in {days} days (on {})",
        expiry.format("%Y-%m-%d")
    )
}

/// How often a user may be reminded while a record sits in its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl ReminderFrequency {
    /// Parse a stored frequency name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Minimum whole days between two reminders.
    pub fn min_interval_days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 28,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's reminder preference for one license type
/// (`license_type_settings` table, keyed by its `type` column).
///
/// A type without a row is not reminded at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSetting {
    /// Type the setting applies to.
    pub license_type: LicenseType,
    /// Days before expiry to start reminding.
    pub reminder_days_before: i64,
    /// Throttle between reminders.
    pub reminder_frequency: ReminderFrequency,
    /// Master switch for this type.
    pub notifications_enabled: bool,
}

impl ReminderSetting {
    /// An enabled setting with the default window and frequency.
    pub fn enabled(license_type: LicenseType) -> Self {
        Self {
            license_type,
            reminder_days_before: DEFAULT_REMINDER_DAYS,
            reminder_frequency: ReminderFrequency::default(),
            notifications_enabled: true,
        }
    }

    /// Whether `expiry` falls inside this setting's window on `today`.
    ///
    /// The window is inclusive at both ends and a non-positive
    /// `reminder_days_before` never matches.
    pub fn in_window(&self, expiry: NaiveDate, today: NaiveDate) -> bool {
        if !self.notifications_enabled || self.reminder_days_before <= 0 {
            return false;
        }
        (0..=self.reminder_days_before).contains(&(expiry - today).num_days())
    }

    /// Whether a reminder may go out today for a record in the window,
    /// given when the user was last reminded.
    pub fn should_remind(
        &self,
        expiry: NaiveDate,
        today: NaiveDate,
        last_reminder: Option<NaiveDate>,
    ) -> bool {
        if !self.in_window(expiry, today) {
            return false;
        }
        match last_reminder {
            None => true,
            Some(last) => {
                (today - last).num_days() >= self.reminder_frequency.min_interval_days()
            }
        }
    }
}
