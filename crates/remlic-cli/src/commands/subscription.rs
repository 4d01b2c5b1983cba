//! Subscription CLI commands.

use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use remlic_core::error::AppError;
use remlic_entity::user::Tier;
use remlic_service::SubscriptionService;
use remlic_service::subscription::plans_for;

use crate::output::{self, OutputFormat};

/// Arguments for subscription commands
#[derive(Debug, Args)]
pub struct SubscriptionArgs {
    /// Subscription subcommand
    #[command(subcommand)]
    pub command: SubscriptionCommand,
}

/// Subscription subcommands
#[derive(Debug, Subcommand)]
pub enum SubscriptionCommand {
    /// Downgrade every user whose subscription has ended
    Sweep,
    /// List configured plan codes per paid tier
    Plans,
}

#[derive(Debug, Serialize, Tabled)]
struct PlanRow {
    tier: String,
    yearly: String,
    monthly: String,
}

/// Execute subscription commands
pub async fn execute(
    args: &SubscriptionArgs,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(env)?;

    match &args.command {
        SubscriptionCommand::Sweep => {
            let stores = super::open_stores(&config).await?;
            let service =
                SubscriptionService::new(stores.profiles.clone(), Arc::new(config.billing.clone()));
            let report = service.sweep(Utc::now()).await;
            stores.close().await;
            let report = report?;

            match format {
                OutputFormat::Json => output::print_json(&report),
                OutputFormat::Table => {
                    output::print_success("Subscription sweep complete");
                    output::print_kv("Checked", &report.checked.to_string());
                    output::print_kv("Downgraded", &report.downgraded.len().to_string());
                    output::print_kv("Failed", &report.failed.len().to_string());
                }
            }
        }
        SubscriptionCommand::Plans => {
            let rows: Vec<PlanRow> = Tier::PAID
                .iter()
                .filter_map(|tier| {
                    plans_for(*tier, &config.billing.plans).map(|plans| PlanRow {
                        tier: tier.to_string(),
                        yearly: plans.yearly.to_string(),
                        monthly: plans.monthly.to_string(),
                    })
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
