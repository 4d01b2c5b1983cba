//! PSIRA registry upstream configuration.

use serde::{Deserialize, Serialize};

/// Where and how to reach the PSIRA applicant lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsiraConfig {
    /// Applicant details endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Upstream request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PsiraConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://psiraapi.sortelearn.com/api/SecurityOfficer/Get_ApplicantDetails".to_string()
}

fn default_timeout() -> u64 {
    15
}
