//! Reminder CLI commands.

use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use remlic_core::error::AppError;
use remlic_service::ReminderService;
use remlic_service::reminder::Reminder;

use crate::output::{self, OutputFormat};

/// Arguments for reminder commands
#[derive(Debug, Args)]
pub struct RemindersArgs {
    /// Reminder subcommand
    #[command(subcommand)]
    pub command: RemindersCommand,
}

/// Reminder subcommands
#[derive(Debug, Subcommand)]
pub enum RemindersCommand {
    /// List records due a reminder
    Report {
        /// Evaluate as of this date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Include records whose notifications are paused
        #[arg(long)]
        include_paused: bool,
    },
    /// Resume notifications paused for longer than the configured period
    Resume,
}

#[derive(Debug, Serialize, Tabled)]
struct ReminderRow {
    user: String,
    #[tabled(rename = "type")]
    license_type: String,
    label: String,
    expiry: String,
    days: i64,
    paused: bool,
}

impl ReminderRow {
    fn new(reminder: &Reminder, paused: bool) -> Self {
        Self {
            user: reminder.user_id.to_string(),
            license_type: reminder.license_type.to_string(),
            label: reminder.label.clone(),
            expiry: reminder.expiry_date.to_string(),
            days: reminder.days_until_expiry,
            paused,
        }
    }
}

/// Execute reminder commands
pub async fn execute(
    args: &RemindersArgs,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let stores = super::open_stores(&config).await?;
    let service = ReminderService::new(
        stores.licenses.clone(),
        stores.profiles.clone(),
        &config.worker,
    );

    let result = match &args.command {
        RemindersCommand::Report {
            date,
            include_paused,
        } => {
            let today = date.unwrap_or_else(|| Utc::now().date_naive());
            service.due_reminders(today).await.map(|report| {
                let mut rows: Vec<ReminderRow> = report
                    .due
                    .iter()
                    .map(|r| ReminderRow::new(r, false))
                    .collect();
                if *include_paused {
                    rows.extend(report.paused.iter().map(|r| ReminderRow::new(r, true)));
                }
                output::print_list(&rows, format);
                if !report.failed.is_empty() {
                    output::print_warning(&format!(
                        "Could not check {} user(s); see logs",
                        report.failed.len()
                    ));
                }
            })
        }
        RemindersCommand::Resume => service.resume_stale_pauses(Utc::now()).await.map(|resumed| {
            output::print_success(&format!("Resumed notifications on {resumed} record(s)"));
        }),
    };

    stores.close().await;
    result
}
