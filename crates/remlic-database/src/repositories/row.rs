//! Conversion between table rows (as `jsonb`) and entities.
//!
//! The license tables differ in their type-specific columns, so rows are
//! selected with `to_jsonb(t)` and written with `jsonb_populate_record`.
//! Reminder settings travel the same way so the column names live here.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use remlic_core::error::AppError;
use remlic_core::result::AppResult;
use remlic_entity::license::model::RESERVED_COLUMNS;
use remlic_entity::license::status::parse_expiry_date;
use remlic_entity::license::{LicenseRecord, LicenseType};
use remlic_entity::user::reminder::{DEFAULT_REMINDER_DAYS, ReminderFrequency, ReminderSetting};

/// Selects a user's `license_type_settings` rows.
pub const REMINDER_SETTINGS_QUERY: &str =
    "SELECT to_jsonb(s) FROM license_type_settings s WHERE s.user_id = $1";

/// Build a record from a `to_jsonb` row of `kind`'s table.
pub fn record_from_row(kind: LicenseType, row: Value) -> AppResult<LicenseRecord> {
    let Value::Object(mut columns) = row else {
        return Err(AppError::database(format!(
            "Expected an object row from {}",
            kind.table()
        )));
    };

    let id = take_uuid(&columns, "id", kind)?;
    let user_id = take_uuid(&columns, "user_id", kind)?;
    let expiry_date = columns
        .get(kind.expiry_column())
        .and_then(Value::as_str)
        .and_then(parse_expiry_date);
    let notifications_paused = columns
        .get("notifications_paused")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let created_at = timestamp(&columns, "created_at").unwrap_or_else(Utc::now);
    let updated_at = timestamp(&columns, "updated_at").unwrap_or(created_at);

    columns.retain(|key, value| !RESERVED_COLUMNS.contains(&key.as_str()) && !value.is_null());

    Ok(LicenseRecord {
        id: id.into(),
        user_id: user_id.into(),
        kind,
        expiry_date,
        notifications_paused,
        created_at,
        updated_at,
        fields: columns,
    })
}

/// Flatten a record into the column object handed to `jsonb_populate_record`.
pub fn row_from_record(record: &LicenseRecord) -> Value {
    let mut columns = record.fields.clone();
    columns.retain(|key, _| !RESERVED_COLUMNS.contains(&key.as_str()));

    columns.insert("id".into(), Value::String(record.id.to_string()));
    columns.insert("user_id".into(), Value::String(record.user_id.to_string()));
    columns.insert(
        record.kind.expiry_column().into(),
        record
            .expiry_date
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
    );
    columns.insert(
        "notifications_paused".into(),
        Value::Bool(record.notifications_paused),
    );
    columns.insert("created_at".into(), Value::String(record.created_at.to_rfc3339()));
    columns.insert("updated_at".into(), Value::String(record.updated_at.to_rfc3339()));

    Value::Object(columns)
}

/// Build a reminder setting from a `license_type_settings` row.
///
/// The table keys types by its `type` column. Rows naming an unknown type
/// are dropped. A blank `notifications_enabled` counts as disabled.
pub fn reminder_setting_from_row(row: &Value) -> Option<ReminderSetting> {
    let raw_type = row.get("type").and_then(Value::as_str)?;
    let Some(license_type) = LicenseType::parse(raw_type) else {
        warn!(license_type = %raw_type, "Ignoring reminder setting for unknown type");
        return None;
    };

    let reminder_days_before = row
        .get("reminder_days_before")
        .and_then(Value::as_i64)
        .unwrap_or(DEFAULT_REMINDER_DAYS);
    let reminder_frequency = match row.get("reminder_frequency").and_then(Value::as_str) {
        None => ReminderFrequency::default(),
        Some(raw) => ReminderFrequency::parse(raw).unwrap_or_else(|| {
            warn!(frequency = %raw, "Unknown reminder frequency, using weekly");
            ReminderFrequency::default()
        }),
    };
    let notifications_enabled = row
        .get("notifications_enabled")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(ReminderSetting {
        license_type,
        reminder_days_before,
        reminder_frequency,
        notifications_enabled,
    })
}

fn take_uuid(columns: &Map<String, Value>, key: &str, kind: LicenseType) -> AppResult<Uuid> {
    columns
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| {
            AppError::database(format!("Row in {} has no valid '{key}' column", kind.table()))
        })
}

fn timestamp(columns: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    columns
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
