//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled maintenance jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler runs inside the server process.
    #[serde(default)]
    pub enabled: bool,
    /// Cron expression for the lapsed-subscription sweep.
    #[serde(default = "default_subscription_cron")]
    pub subscription_sweep_cron: String,
    /// Cron expression for resuming stale paused notifications.
    #[serde(default = "default_resume_cron")]
    pub notification_resume_cron: String,
    /// Days after which paused notifications are resumed.
    #[serde(default = "default_pause_days")]
    pub pause_expiry_days: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            subscription_sweep_cron: default_subscription_cron(),
            notification_resume_cron: default_resume_cron(),
            pause_expiry_days: default_pause_days(),
        }
    }
}

fn default_subscription_cron() -> String {
    "0 0 1 * * *".to_string()
}

fn default_resume_cron() -> String {
    "0 30 1 * * *".to_string()
}

fn default_pause_days() -> i64 {
    5
}
