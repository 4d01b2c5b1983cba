//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files and
//! `REMLIC_*` environment variables via the `config` crate. The root
//! [`AppConfig`] is built once at process start and handed to consumers
//! behind an `Arc`.

pub mod app;
pub mod backend;
pub mod billing;
pub mod database;
pub mod logging;
pub mod psira;
pub mod worker;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::app::{CorsConfig, ServerConfig};
pub use self::backend::BackendConfig;
pub use self::billing::{BillingConfig, PlanCodes};
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;
pub use self::psira::PsiraConfig;
pub use self::worker::WorkerConfig;

use crate::error::{AppError, ErrorKind};

/// Environment variable prefix for overrides, e.g. `REMLIC_SERVER__PORT`.
pub const ENV_PREFIX: &str = "REMLIC";

/// Runtime mode the process was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Local development.
    #[default]
    Development,
    /// Production deployment.
    Production,
    /// Automated tests. Required-key validation is skipped.
    Test,
}

impl RuntimeMode {
    /// Parse a mode name, falling back to development for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Runtime mode.
    #[serde(default)]
    pub mode: RuntimeMode,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Backend-as-a-service settings (auth tokens, project URL).
    #[serde(default)]
    pub backend: BackendConfig,
    /// Payment gateway settings.
    #[serde(default)]
    pub billing: BillingConfig,
    /// PSIRA registry upstream settings.
    #[serde(default)]
    pub psira: PsiraConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Raised when required configuration keys are absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required configuration keys: {}", .missing.join(", "))]
pub struct ConfigValidationError {
    /// Dotted key paths that were missing, in declaration order.
    pub missing: Vec<&'static str>,
}

impl From<ConfigValidationError> for AppError {
    fn from(err: ConfigValidationError) -> Self {
        AppError::with_source(ErrorKind::Configuration, err.to_string(), err)
    }
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml` and environment
    /// variables prefixed with `REMLIC_`. The runtime mode defaults to the
    /// environment name.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .set_default("mode", RuntimeMode::from_name(env).to_string())?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Load configuration and fail fast if required keys are missing.
    pub fn load_validated(env: &str) -> Result<Self, AppError> {
        let config = Self::load(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from an in-memory TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Check that every required key is present.
    ///
    /// Skipped entirely in [`RuntimeMode::Test`].
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.mode == RuntimeMode::Test {
            return Ok(());
        }

        let missing = self.missing_keys();
        if missing.is_empty() {
            Ok(())
        } else {
            tracing::error!(missing = ?missing, "Missing required configuration keys");
            Err(ConfigValidationError { missing })
        }
    }

    /// All required keys that are currently absent or blank.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut required = self.backend.required_keys();
        required.extend(self.billing.required_keys());

        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"
        [backend]
        url = "https://project.supabase.co"
        anon_key = "anon"
        jwt_secret = "secret"

        [billing]
        public_key = "pk_test"

        [billing.plans]
        tier1 = "PLN_1"
        tier2 = "PLN_2"
        tier3 = "PLN_3"
        tier4 = "PLN_4"
        premium = "PLN_P"
        tier1_monthly = "PLN_1M"
        tier2_monthly = "PLN_2M"
        tier3_monthly = "PLN_3M"
        tier4_monthly = "PLN_4M"
        premium_monthly = "PLN_PM"
    "#;

    #[test]
    fn test_complete_config_validates() {
        let config = AppConfig::from_toml(COMPLETE).expect("parse");
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.provider, DatabaseProvider::Postgres);
    }

    #[test]
    fn test_missing_keys_are_all_listed() {
        let config = AppConfig::from_toml(
            r#"
            [backend]
            url = "https://project.supabase.co"
            "#,
        )
        .expect("parse");

        let err = config.validate().expect_err("should fail");
        assert!(err.missing.contains(&"backend.anon_key"));
        assert!(err.missing.contains(&"backend.jwt_secret"));
        assert!(err.missing.contains(&"billing.public_key"));
        assert!(err.missing.contains(&"billing.plans.premium_monthly"));
        assert!(!err.missing.contains(&"backend.url"));
        assert_eq!(err.missing.len(), 13);

        let app_err: AppError = err.into();
        assert_eq!(app_err.kind, ErrorKind::Configuration);
        assert!(app_err.message.contains("backend.anon_key"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = AppConfig::from_toml(&COMPLETE.replace("\"pk_test\"", "\"  \"")).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.missing, vec!["billing.public_key"]);
    }

    #[test]
    fn test_mode_test_skips_validation() {
        let config = AppConfig::from_toml("mode = \"test\"").expect("parse");
        assert_eq!(config.mode, RuntimeMode::Test);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_runtime_mode_from_name() {
        assert_eq!(RuntimeMode::from_name("production"), RuntimeMode::Production);
        assert_eq!(RuntimeMode::from_name("TEST"), RuntimeMode::Test);
        assert_eq!(RuntimeMode::from_name("staging"), RuntimeMode::Development);
    }
}
