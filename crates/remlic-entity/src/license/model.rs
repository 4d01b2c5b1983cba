//! License record entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use remlic_core::types::{LicenseId, UserId};

use super::kind::LicenseType;

/// Columns that are modelled explicitly and never kept in `fields`.
pub const RESERVED_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "type",
    "expiry_date",
    "certificate_expiry_date",
    "notifications_paused",
    "created_at",
    "updated_at",
];

/// One tracked document, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Record identifier.
    pub id: LicenseId,
    /// Owning user.
    pub user_id: UserId,
    /// Which table the record lives in.
    #[serde(rename = "type")]
    pub kind: LicenseType,
    /// Expiry date, if the document expires.
    pub expiry_date: Option<NaiveDate>,
    /// Whether reminders are suppressed.
    #[serde(default)]
    pub notifications_paused: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
    /// Type-specific columns (names, numbers, make/model, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LicenseRecord {
    /// Build a freshly inserted record.
    pub fn from_new(user_id: UserId, new: NewLicense, now: DateTime<Utc>) -> Self {
        Self {
            id: LicenseId::new(),
            user_id,
            kind: new.kind,
            expiry_date: new.expiry_date,
            notifications_paused: false,
            created_at: now,
            updated_at: now,
            fields: new.fields,
        }
    }

    /// A type-specific field as text, if present and non-empty.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Human label for lists and reminder reports.
    pub fn label(&self) -> String {
        let name = match (self.field_str("first_name"), self.field_str("last_name")) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.to_string()),
            _ => None,
        };

        name.or_else(|| {
            ["description", "contract_name", "make_model", "registration_number"]
                .iter()
                .find_map(|key| self.field_str(key))
                .map(str::to_string)
        })
        .or_else(|| match (self.field_str("make"), self.field_str("model")) {
            (Some(make), Some(model)) => Some(format!("{make} {model}")),
            _ => None,
        })
        .unwrap_or_else(|| self.kind.title().to_string())
    }
}

/// Data required to create a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLicense {
    /// Target type.
    pub kind: LicenseType,
    /// Expiry date.
    pub expiry_date: Option<NaiveDate>,
    /// Type-specific columns.
    pub fields: Map<String, Value>,
}

impl NewLicense {
    /// Required fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.kind
            .required_fields()
            .iter()
            .copied()
            .filter(|name| {
                self.fields
                    .get(*name)
                    .map(|v| match v {
                        Value::Null => true,
                        Value::String(s) => s.trim().is_empty(),
                        _ => false,
                    })
                    .unwrap_or(true)
            })
            .collect()
    }
}
