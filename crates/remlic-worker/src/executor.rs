//! Job trait and execution wrapper.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use remlic_core::error::AppError;

/// A unit of scheduled work.
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Stable name used in logs.
    fn job_type(&self) -> &str;

    /// Run once as of `now` and return a JSON summary.
    async fn execute(&self, now: DateTime<Utc>) -> Result<Value, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Failure that may succeed on the next scheduled run
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Execute a job, logging its summary or failure. Errors never escape; the
/// next tick simply tries again.
pub async fn run_job(handler: &dyn JobHandler, now: DateTime<Utc>) -> Option<Value> {
    let started = Instant::now();
    tracing::info!(job = handler.job_type(), "Executing job");

    match handler.execute(now).await {
        Ok(summary) => {
            tracing::info!(
                job = handler.job_type(),
                duration_ms = started.elapsed().as_millis() as u64,
                summary = %summary,
                "Job completed"
            );
            Some(summary)
        }
        Err(e) => {
            tracing::error!(job = handler.job_type(), error = %e, "Job failed");
            None
        }
    }
}
