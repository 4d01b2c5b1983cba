//! Configuration CLI commands.

use clap::{Args, Subcommand};

use remlic_core::config::AppConfig;
use remlic_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets omitted)
    Show,
    /// Check that every required key is set
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = AppConfig::load(env)?;

    match &args.command {
        ConfigCommand::Show => output::print_json(&config),
        ConfigCommand::Validate => {
            if let Err(e) = config.validate() {
                if format == OutputFormat::Json {
                    output::print_json(&serde_json::json!({ "valid": false, "missing": e.missing }));
                } else {
                    for key in &e.missing {
                        output::print_warning(&format!("missing: {key}"));
                    }
                }
                return Err(e.into());
            }

            match format {
                OutputFormat::Json => output::print_json(&serde_json::json!({ "valid": true })),
                OutputFormat::Table => {
                    output::print_success(&format!("Configuration for '{env}' is valid"));
                    output::print_kv("Mode", &config.mode.to_string());
                    output::print_kv(
                        "Server",
                        &format!("{}:{}", config.server.host, config.server.port),
                    );
                    output::print_kv("Database", &format!("{:?}", config.database.provider));
                    output::print_kv("Worker enabled", &config.worker.enabled.to_string());
                }
            }
        }
    }

    Ok(())
}
