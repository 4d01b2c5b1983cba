//! Expiry reminder selection and automatic resume of paused notifications.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use remlic_core::config::WorkerConfig;
use remlic_core::result::AppResult;
use remlic_core::types::{LicenseId, UserId};
use remlic_database::store::{LicenseStore, ProfileStore};
use remlic_entity::license::{LicenseRecord, LicenseType};
use remlic_entity::user::reminder::reminder_message;

/// A record whose expiry falls inside its reminder window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub user_id: UserId,
    pub license_type: LicenseType,
    pub license_id: LicenseId,
    pub label: String,
    pub expiry_date: NaiveDate,
    /// Calendar days from today to expiry.
    pub days_until_expiry: i64,
}

impl Reminder {
    /// Notification text recorded when this reminder goes out.
    pub fn message(&self) -> String {
        reminder_message(self.days_until_expiry, self.expiry_date)
    }
}

/// Records due a reminder, split by whether notifications are paused.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReminderReport {
    pub due: Vec<Reminder>,
    pub paused: Vec<Reminder>,
    /// Active users whose records could not be checked.
    pub failed: Vec<UserId>,
}

/// Selects reminders and resumes stale pauses.
#[derive(Clone)]
pub struct ReminderService {
    licenses: Arc<dyn LicenseStore>,
    profiles: Arc<dyn ProfileStore>,
    pause_expiry_days: i64,
}

impl ReminderService {
    /// Creates a new reminder service.
    pub fn new(
        licenses: Arc<dyn LicenseStore>,
        profiles: Arc<dyn ProfileStore>,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            licenses,
            profiles,
            pause_expiry_days: config.pause_expiry_days,
        }
    }

    /// Reminders due on `today` for every active subscriber.
    ///
    /// Only types with an enabled setting row are considered. Paused
    /// records inside the window are reported without throttling. A user
    /// whose data cannot be loaded is logged and skipped.
    pub async fn due_reminders(&self, today: NaiveDate) -> AppResult<ReminderReport> {
        let mut report = ReminderReport::default();

        for profile in self.profiles.list_active().await? {
            if let Err(e) = self.collect_for_user(profile.id, today, &mut report).await {
                warn!(user_id = %profile.id, error = %e, "Skipping reminders for user");
                report.failed.push(profile.id);
            }
        }

        report.due.sort_by_key(|r| (r.days_until_expiry, r.user_id));
        report.paused.sort_by_key(|r| (r.days_until_expiry, r.user_id));
        info!(
            due = report.due.len(),
            paused = report.paused.len(),
            failed = report.failed.len(),
            "Reminder selection complete"
        );
        Ok(report)
    }

    /// Record every due reminder in its owner's notifications.
    /// Returns how many were recorded.
    pub async fn record_sent(&self, report: &ReminderReport) -> AppResult<usize> {
        for reminder in &report.due {
            self.profiles
                .record_reminder(
                    reminder.user_id,
                    reminder.license_type,
                    reminder.license_id,
                    &reminder.message(),
                )
                .await?;
        }
        Ok(report.due.len())
    }

    async fn collect_for_user(
        &self,
        user_id: UserId,
        today: NaiveDate,
        report: &mut ReminderReport,
    ) -> AppResult<()> {
        let settings = self.profiles.reminder_settings(user_id).await?;
        if !settings.iter().any(|s| s.notifications_enabled) {
            return Ok(());
        }
        let last_reminder = self
            .profiles
            .last_reminder_at(user_id)
            .await?
            .map(|at| at.date_naive());

        for setting in settings.iter().filter(|s| s.notifications_enabled) {
            for record in self.licenses.list(user_id, setting.license_type).await? {
                let Some(expiry) = record.expiry_date else {
                    continue;
                };
                if !setting.in_window(expiry, today) {
                    continue;
                }

                let reminder = to_reminder(&record, expiry, (expiry - today).num_days());
                if record.notifications_paused {
                    report.paused.push(reminder);
                } else if setting.should_remind(expiry, today, last_reminder) {
                    report.due.push(reminder);
                } else {
                    debug!(
                        %user_id,
                        license_id = %record.id,
                        frequency = %setting.reminder_frequency,
                        "Reminder throttled"
                    );
                }
            }
        }
        Ok(())
    }

    /// Resume notifications paused for longer than the configured period.
    pub async fn resume_stale_pauses(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let cutoff = now - Duration::days(self.pause_expiry_days);
        let mut total = 0;

        for kind in LicenseType::ALL {
            let resumed = self.licenses.resume_paused_before(kind, cutoff).await?;
            if resumed > 0 {
                debug!(table = kind.table(), resumed, "Resumed paused notifications");
            }
            total += resumed;
        }

        info!(resumed = total, cutoff = %cutoff, "Paused notification check complete");
        Ok(total)
    }
}

fn to_reminder(record: &LicenseRecord, expiry: NaiveDate, days: i64) -> Reminder {
    Reminder {
        user_id: record.user_id,
        license_type: record.kind,
        license_id: record.id,
        label: record.label(),
        expiry_date: expiry,
        days_until_expiry: days,
    }
}
