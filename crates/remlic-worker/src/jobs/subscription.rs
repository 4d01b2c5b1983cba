//! Downgrades users whose subscription period has ended.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use remlic_service::SubscriptionService;

use crate::executor::{JobExecutionError, JobHandler};

/// Runs the subscription sweep.
#[derive(Clone)]
pub struct SubscriptionSweepHandler {
    subscriptions: Arc<SubscriptionService>,
}

impl std::fmt::Debug for SubscriptionSweepHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionSweepHandler").finish()
    }
}

impl SubscriptionSweepHandler {
    pub fn new(subscriptions: Arc<SubscriptionService>) -> Self {
        Self { subscriptions }
    }
}

#[async_trait]
impl JobHandler for SubscriptionSweepHandler {
    fn job_type(&self) -> &str {
        "subscription_sweep"
    }

    async fn execute(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError> {
        let report = self.subscriptions.sweep(now).await?;

        if !report.failed.is_empty() {
            tracing::warn!(
                failed = report.failed.len(),
                "Some profiles could not be downgraded"
            );
        }

        Ok(json!({
            "task": self.job_type(),
            "checked": report.checked,
            "downgraded": report.downgraded.len(),
            "failed": report.failed.len(),
        }))
    }
}
