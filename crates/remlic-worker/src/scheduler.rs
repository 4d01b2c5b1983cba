//! Cron scheduler for periodic jobs.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use remlic_core::config::WorkerConfig;
use remlic_core::error::AppError;
use remlic_service::{ReminderService, SubscriptionService};

use crate::executor::{JobHandler, run_job};
use crate::jobs::{NotificationJobHandler, SubscriptionSweepHandler};

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Names of registered jobs with their schedules
    registered: Vec<(String, String)>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("registered", &self.registered)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            registered: Vec::new(),
        })
    }

    /// Register the subscription sweep and notification upkeep jobs
    pub async fn register_default_tasks(
        &mut self,
        config: &WorkerConfig,
        subscriptions: Arc<SubscriptionService>,
        reminders: Arc<ReminderService>,
    ) -> Result<(), AppError> {
        self.register(
            &config.subscription_sweep_cron,
            Arc::new(SubscriptionSweepHandler::new(subscriptions)),
        )
        .await?;
        self.register(
            &config.notification_resume_cron,
            Arc::new(NotificationJobHandler::new(reminders)),
        )
        .await?;

        tracing::info!(count = self.registered.len(), "All scheduled tasks registered");
        Ok(())
    }

    /// Run `handler` on a six-field cron schedule (seconds first)
    pub async fn register(
        &mut self,
        schedule: &str,
        handler: Arc<dyn JobHandler>,
    ) -> Result<(), AppError> {
        let name = handler.job_type().to_string();

        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                run_job(handler.as_ref(), Utc::now()).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid schedule '{schedule}' for {name}: {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {name} schedule: {e}")))?;

        tracing::info!(job = %name, schedule = %schedule, "Registered scheduled job");
        self.registered.push((name, schedule.to_string()));
        Ok(())
    }

    /// Registered job names and schedules
    pub fn registered(&self) -> &[(String, String)] {
        &self.registered
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::JobExecutionError;
    use async_trait::async_trait;
    use chrono::DateTime;
    use serde_json::Value;

    #[derive(Debug)]
    struct Noop;

    #[async_trait]
    impl JobHandler for Noop {
        fn job_type(&self) -> &str {
            "noop"
        }

        async fn execute(&self, _now: DateTime<Utc>) -> Result<Value, JobExecutionError> {
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn test_register_valid_schedule() {
        let mut scheduler = CronScheduler::new().await.unwrap();
        scheduler.register("0 0 1 * * *", Arc::new(Noop)).await.unwrap();
        assert_eq!(scheduler.registered().len(), 1);
        assert_eq!(scheduler.registered()[0].0, "noop");
    }

    #[tokio::test]
    async fn test_register_rejects_bad_schedule() {
        let mut scheduler = CronScheduler::new().await.unwrap();
        let err = scheduler
            .register("every day", Arc::new(Noop))
            .await
            .unwrap_err();
        assert!(err.message.contains("Invalid schedule"));
        assert!(scheduler.registered().is_empty());
    }
}
