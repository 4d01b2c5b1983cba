//! License type catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use remlic_core::AppError;

/// Every category of document a user can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseType {
    Vehicles,
    Drivers,
    Firearms,
    Prpds,
    Works,
    Passports,
    Tvlicenses,
    Psira,
    Others,
    Competency,
}

impl LicenseType {
    /// All types in dashboard order.
    pub const ALL: [LicenseType; 10] = [
        Self::Vehicles,
        Self::Drivers,
        Self::Firearms,
        Self::Prpds,
        Self::Works,
        Self::Passports,
        Self::Tvlicenses,
        Self::Psira,
        Self::Others,
        Self::Competency,
    ];

    /// Canonical identifier used in URLs and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Drivers => "drivers",
            Self::Firearms => "firearms",
            Self::Prpds => "prpds",
            Self::Works => "works",
            Self::Passports => "passports",
            Self::Tvlicenses => "tvlicenses",
            Self::Psira => "psira",
            Self::Others => "others",
            Self::Competency => "competency",
        }
    }

    /// Backing table name.
    ///
    /// Table names are only ever produced from this match, so they are safe
    /// to interpolate into SQL.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Drivers => "drivers",
            Self::Firearms => "firearms",
            Self::Prpds => "prpd",
            Self::Works => "works",
            Self::Passports => "passports",
            Self::Tvlicenses => "tv_licenses",
            Self::Psira => "psira_records",
            Self::Others => "other_documents",
            Self::Competency => "competency",
        }
    }

    /// Column holding the expiry date.
    pub fn expiry_column(&self) -> &'static str {
        match self {
            Self::Psira => "certificate_expiry_date",
            _ => "expiry_date",
        }
    }

    /// Section heading shown on the dashboard.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Vehicles => "Vehicle Registration",
            Self::Drivers => "Driver's License",
            Self::Firearms => "Firearm License",
            Self::Prpds => "PrPD",
            Self::Works => "Work Contract",
            Self::Passports => "Passport",
            Self::Tvlicenses => "TV License",
            Self::Psira => "PSIRA Registration",
            Self::Others => "Other Document",
            Self::Competency => "Competency Certificate",
        }
    }

    /// Singular noun used in messages ("Add a new vehicle license").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Vehicles => "vehicle license",
            Self::Drivers => "driver's license",
            Self::Firearms => "firearm license",
            Self::Prpds => "PrPD",
            Self::Works => "work contract",
            Self::Passports => "passport",
            Self::Tvlicenses => "TV license",
            Self::Psira => "PSIRA record",
            Self::Others => "document",
            Self::Competency => "competency certificate",
        }
    }

    /// Type-specific fields that must be non-empty on creation.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Drivers | Self::Prpds => &["first_name", "last_name", "id_number"],
            Self::Vehicles => &["make", "model", "registration_number"],
            Self::Firearms => &["make_model", "caliber", "registration_number"],
            Self::Works => &["contract_name", "contract_type", "company_name"],
            Self::Passports => &["first_name", "last_name", "passport_number"],
            Self::Tvlicenses => &["first_name", "last_name", "license_number"],
            Self::Others => &["description", "document_type"],
            Self::Psira => &["first_name", "last_name", "psira_number"],
            Self::Competency => &["first_name", "last_name", "id_number", "firearm_type"],
        }
    }

    /// Whether this type is only available on paid tiers.
    pub fn is_paid_only(&self) -> bool {
        matches!(self, Self::Psira | Self::Competency)
    }

    /// Resolve a canonical id, table name or singular alias.
    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value.trim().to_ascii_lowercase().as_str() {
            "vehicles" | "vehicle" => Self::Vehicles,
            "drivers" | "driver" => Self::Drivers,
            "firearms" | "firearm" => Self::Firearms,
            "prpds" | "prpd" => Self::Prpds,
            "works" | "work" => Self::Works,
            "passports" | "passport" => Self::Passports,
            "tvlicenses" | "tvlicense" | "tv_licenses" => Self::Tvlicenses,
            "psira" | "psira_records" => Self::Psira,
            "others" | "other" | "other_documents" => Self::Others,
            "competency" => Self::Competency,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AppError::validation(format!("Unknown license type: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prpd_aliases_share_one_table() {
        assert_eq!(LicenseType::parse("prpds"), Some(LicenseType::Prpds));
        assert_eq!(LicenseType::parse("prpd"), Some(LicenseType::Prpds));
        assert_eq!(LicenseType::Prpds.table(), "prpd");
    }

    #[test]
    fn test_table_mapping() {
        assert_eq!(LicenseType::Tvlicenses.table(), "tv_licenses");
        assert_eq!(LicenseType::Others.table(), "other_documents");
        assert_eq!(LicenseType::Psira.table(), "psira_records");
        assert_eq!(LicenseType::Competency.table(), "competency");
    }

    #[test]
    fn test_parse_accepts_table_names() {
        for kind in LicenseType::ALL {
            assert_eq!(LicenseType::parse(kind.table()), Some(kind));
            assert_eq!(LicenseType::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(LicenseType::parse("boats").is_none());
        assert!("boats".parse::<LicenseType>().is_err());
    }

    #[test]
    fn test_psira_expiry_column() {
        assert_eq!(LicenseType::Psira.expiry_column(), "certificate_expiry_date");
        assert_eq!(LicenseType::Drivers.expiry_column(), "expiry_date");
    }
}
