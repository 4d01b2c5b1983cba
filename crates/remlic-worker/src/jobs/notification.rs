//! Notification upkeep: resume stale pauses and record due reminders.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use remlic_service::ReminderService;

use crate::executor::{JobExecutionError, JobHandler};

/// Resumes notifications paused for too long, then selects the
/// reminders due today and records them so the frequency throttle sees
/// them on the next run.
#[derive(Clone)]
pub struct NotificationJobHandler {
    reminders: Arc<ReminderService>,
}

impl std::fmt::Debug for NotificationJobHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationJobHandler").finish()
    }
}

impl NotificationJobHandler {
    pub fn new(reminders: Arc<ReminderService>) -> Self {
        Self { reminders }
    }
}

#[async_trait]
impl JobHandler for NotificationJobHandler {
    fn job_type(&self) -> &str {
        "notification_resume"
    }

    async fn execute(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError> {
        let resumed = self.reminders.resume_stale_pauses(now).await?;
        let report = self.reminders.due_reminders(now.date_naive()).await?;

        for reminder in &report.due {
            tracing::info!(
                user_id = %reminder.user_id,
                license_type = %reminder.license_type,
                license_id = %reminder.license_id,
                days_until_expiry = reminder.days_until_expiry,
                "Reminder due"
            );
        }

        let recorded = self.reminders.record_sent(&report).await?;

        Ok(json!({
            "task": self.job_type(),
            "resumed": resumed,
            "due": report.due.len(),
            "paused": report.paused.len(),
            "recorded": recorded,
            "failed": report.failed.len(),
        }))
    }
}
