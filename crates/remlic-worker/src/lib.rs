//! Scheduled background jobs for RemLic.
//!
//! This crate provides:
//! - A job trait and runner that logs and times each execution
//! - A cron scheduler that registers the built-in jobs
//! - The subscription sweep and notification upkeep jobs

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobHandler};
pub use scheduler::CronScheduler;
