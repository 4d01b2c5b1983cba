//! Response DTOs.

use serde::{Deserialize, Serialize};

use remlic_service::{DashboardState, LimitCheck};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Dashboard payload: per-type entries plus the filtered view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub state: DashboardState,
    /// Entries after search and section filters.
    pub visible: Vec<remlic_service::TypeEntry>,
}

impl From<DashboardState> for DashboardResponse {
    fn from(state: DashboardState) -> Self {
        let visible = state.visible_records();
        Self { state, visible }
    }
}

/// Limit check for one type.
#[derive(Debug, Clone, Serialize)]
pub struct LimitResponse {
    pub license_type: String,
    #[serde(flatten)]
    pub check: LimitCheck,
    /// Set when the limit has been reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Contact endpoint body, success and failure alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}
