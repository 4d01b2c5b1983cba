//! Request DTOs with validation.

use serde::Deserialize;
use serde_json::{Map, Value};
use validator::Validate;

/// Create a record. Everything besides the expiry date is a type-specific
/// column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLicenseRequest {
    /// Expiry date in `YYYY-MM-DD` form.
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Remaining columns.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Renew a record.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenewRequest {
    /// New expiry date. Bare digits are dashed automatically.
    #[validate(length(min = 1, message = "Expiry date is required"))]
    pub expiry_date: String,
}

/// Pause or resume reminders for a record.
#[derive(Debug, Clone, Deserialize)]
pub struct PauseRequest {
    pub paused: bool,
    /// Required when pausing active reminders.
    #[serde(default)]
    pub confirmed: bool,
}

/// Query for destructive deletes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirmed: bool,
}

/// Dashboard filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    /// Case-insensitive search across record fields.
    pub search: Option<String>,
    /// Expand one section.
    pub section: Option<String>,
}
