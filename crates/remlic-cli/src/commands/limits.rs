//! Tier limit CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use remlic_core::error::AppError;
use remlic_entity::license::LicenseType;
use remlic_entity::user::Tier;
use remlic_service::limit;

use crate::output::{self, OutputFormat};

/// Arguments for limit commands
#[derive(Debug, Args)]
pub struct LimitsArgs {
    /// Limit subcommand
    #[command(subcommand)]
    pub command: LimitsCommand,
}

/// Limit subcommands
#[derive(Debug, Subcommand)]
pub enum LimitsCommand {
    /// Show the per-type limits of a tier
    Table {
        /// Tier name as stored on a profile; unknown names count as free
        #[arg(short, long, default_value = "free")]
        tier: String,
    },
    /// Decide whether one more record may be added
    Check {
        /// Tier name
        tier: String,
        /// License type
        license_type: String,
        /// Records already held
        count: u32,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct LimitRow {
    #[tabled(rename = "type")]
    license_type: &'static str,
    title: &'static str,
    limit: String,
    paid_only: bool,
}

/// Execute limit commands
pub fn execute(args: &LimitsArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        LimitsCommand::Table { tier } => {
            let tier = Tier::from_profile(Some(tier));
            let rows: Vec<LimitRow> = LicenseType::ALL
                .iter()
                .map(|kind| LimitRow {
                    license_type: kind.as_str(),
                    title: kind.title(),
                    limit: tier.limit_for(*kind).to_string(),
                    paid_only: kind.is_paid_only(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        LimitsCommand::Check {
            tier,
            license_type,
            count,
        } => {
            let check = limit::can_add(Some(tier), license_type, *count);
            match (format, check.message()) {
                (OutputFormat::Json, _) => output::print_json(&check),
                (OutputFormat::Table, None) => output::print_success(&format!(
                    "Allowed: {} of {} used",
                    check.current_count, check.limit
                )),
                (OutputFormat::Table, Some(message)) => output::print_warning(&message),
            }
        }
    }

    Ok(())
}
