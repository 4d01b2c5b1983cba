//! Dashboard search matching.

use remlic_entity::license::LicenseRecord;

/// Fields the dashboard search looks at.
pub const SEARCH_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "id_number",
    "registration_number",
    "make",
    "model",
    "make_model",
    "license_number",
    "passport_number",
    "psira_number",
    "description",
    "document_type",
    "contract_name",
    "company_name",
];

/// Case-insensitive substring match over the searchable fields.
/// A blank query matches everything.
pub fn matches_search(record: &LicenseRecord, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    SEARCH_FIELDS
        .iter()
        .filter_map(|field| record.field_str(field))
        .any(|value| value.to_lowercase().contains(&query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use remlic_core::types::UserId;
    use remlic_entity::license::{LicenseType, NewLicense};
    use serde_json::json;

    fn record(fields: serde_json::Value) -> LicenseRecord {
        LicenseRecord::from_new(
            UserId::new(),
            NewLicense {
                kind: LicenseType::Vehicles,
                expiry_date: None,
                fields: fields.as_object().cloned().unwrap_or_default(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_matches_case_insensitively() {
        let r = record(json!({"make": "Toyota", "registration_number": "CA 123-456"}));
        assert!(matches_search(&r, "toy"));
        assert!(matches_search(&r, "ca 123"));
        assert!(matches_search(&r, "  "));
        assert!(!matches_search(&r, "ford"));
    }

    #[test]
    fn test_ignores_unsearchable_fields() {
        let r = record(json!({"notes": "toyota"}));
        assert!(!matches_search(&r, "toyota"));
    }
}
