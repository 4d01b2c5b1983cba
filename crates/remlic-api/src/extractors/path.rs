//! Typed path parameter helpers.

use remlic_core::error::AppError;
use remlic_core::types::LicenseId;
use remlic_entity::license::LicenseType;

/// Parses a license type from a path segment.
pub fn parse_license_type(s: &str) -> Result<LicenseType, AppError> {
    s.parse()
}

/// Parses a record ID from a path segment.
pub fn parse_license_id(s: &str) -> Result<LicenseId, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid license ID: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_license_type() {
        assert_eq!(parse_license_type("drivers").unwrap(), LicenseType::Drivers);
        assert!(parse_license_type("boats").is_err());
    }

    #[test]
    fn test_parse_license_id() {
        assert!(parse_license_id("not-a-uuid").is_err());
        let id = LicenseId::new();
        assert_eq!(parse_license_id(&id.to_string()).unwrap(), id);
    }
}
