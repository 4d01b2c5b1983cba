//! Backend-as-a-service configuration.

use serde::{Deserialize, Serialize};

/// Connection details for the hosted backend that issues user tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL.
    #[serde(default)]
    pub url: String,
    /// Public anonymous API key.
    #[serde(default)]
    pub anon_key: String,
    /// HMAC secret used to verify access tokens.
    #[serde(default, skip_serializing)]
    pub jwt_secret: String,
    /// Expected `aud` claim on access tokens.
    #[serde(default = "default_audience")]
    pub jwt_audience: String,
}

impl BackendConfig {
    pub(crate) fn required_keys(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("backend.url", self.url.as_str()),
            ("backend.anon_key", self.anon_key.as_str()),
            ("backend.jwt_secret", self.jwt_secret.as_str()),
        ]
    }
}

fn default_audience() -> String {
    "authenticated".to_string()
}
