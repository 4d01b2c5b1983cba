//! CLI command definitions and dispatch.

pub mod config;
pub mod limits;
pub mod reminders;
pub mod subscription;

use clap::{Parser, Subcommand};

use remlic_core::config::AppConfig;
use remlic_core::error::AppError;
use remlic_database::Stores;

use crate::output::OutputFormat;

/// RemLic: license and document expiry tracking
#[derive(Debug, Parser)]
#[command(name = "remlic", version, about, long_about = None)]
pub struct Cli {
    /// Environment name; selects `config/<env>.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Configuration checks
    Config(config::ConfigArgs),
    /// Subscription maintenance
    Subscription(subscription::SubscriptionArgs),
    /// Expiry reminders
    Reminders(reminders::RemindersArgs),
    /// Tier limits
    Limits(limits::LimitsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Config(args) => config::execute(args, &self.env, self.format),
            Commands::Subscription(args) => {
                subscription::execute(args, &self.env, self.format).await
            }
            Commands::Reminders(args) => reminders::execute(args, &self.env, self.format).await,
            Commands::Limits(args) => limits::execute(args, self.format),
        }
    }
}

/// Helper: load and validate configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_validated(env)
}

/// Helper: open the configured stores
pub async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    Stores::open(&config.database).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reminder_report() {
        let cli = Cli::try_parse_from([
            "remlic",
            "--format",
            "json",
            "reminders",
            "report",
            "--date",
            "2025-06-01",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Reminders(_)));
    }
}
