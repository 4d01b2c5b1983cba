//! Per-type dashboard entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remlic_entity::license::{ExpiryStatus, LicenseRecord, LicenseType};
use remlic_entity::user::Tier;

/// A record together with its computed status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    /// The stored record.
    #[serde(flatten)]
    pub record: LicenseRecord,
    /// Status at load time.
    pub status: ExpiryStatus,
}

/// Everything the dashboard shows for one license type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub license_type: LicenseType,
    pub title: String,
    /// Records in display order.
    pub records: Vec<RecordView>,
    /// Total records held, regardless of filtering.
    pub count: u32,
    /// Tier limit, `None` when unlimited.
    pub limit: Option<u32>,
    /// Slots left, `None` when unlimited.
    pub remaining: Option<u32>,
    pub limit_reached: bool,
}

impl TypeEntry {
    /// Compute statuses, order records and attach the tier limit.
    pub fn build(
        kind: LicenseType,
        records: Vec<LicenseRecord>,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> Self {
        let mut records: Vec<RecordView> = records
            .into_iter()
            .map(|record| RecordView {
                status: ExpiryStatus::for_date(record.expiry_date, now),
                record,
            })
            .collect();
        records.sort_by(|a, b| a.status.display_cmp(&b.status));

        let count = u32::try_from(records.len()).unwrap_or(u32::MAX);
        let limit = tier.limit_for(kind);

        Self {
            license_type: kind,
            title: kind.title().to_string(),
            records,
            count,
            limit: limit.as_max(),
            remaining: limit.remaining(count),
            limit_reached: !limit.allows_another(count),
        }
    }
}

/// A fully loaded dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub tier: Tier,
    pub has_active_subscription: bool,
    /// One entry per license type, in catalog order.
    pub entries: Vec<TypeEntry>,
    pub loaded_at: DateTime<Utc>,
}

impl DashboardView {
    /// The entry for one type.
    pub fn entry(&self, kind: LicenseType) -> Option<&TypeEntry> {
        self.entries.iter().find(|e| e.license_type == kind)
    }
}
