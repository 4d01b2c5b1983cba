//! Expiry status computation.
//!
//! Status is always derived from the stored date and the current instant;
//! it is never persisted.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Records expiring within this many days are flagged.
pub const EXPIRING_SOON_DAYS: i64 = 36;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Renewal status of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryStatus {
    /// Not yet expired.
    pub is_valid: bool,
    /// Whole days until expiry (rounded up); `None` means no expiry.
    pub days_left: Option<i64>,
    /// Valid and within [`EXPIRING_SOON_DAYS`].
    pub is_expiring_soon: bool,
}

impl ExpiryStatus {
    /// Status of a record that never expires.
    pub const NO_EXPIRY: Self = Self {
        is_valid: true,
        days_left: None,
        is_expiring_soon: false,
    };

    /// Compute the status for an expiry instant.
    pub fn compute(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(expiry) = expiry else {
            return Self::NO_EXPIRY;
        };

        let millis = (expiry - now).num_milliseconds();
        let days_left = millis.div_euclid(MILLIS_PER_DAY)
            + i64::from(millis.rem_euclid(MILLIS_PER_DAY) > 0);
        let is_valid = days_left > 0;

        Self {
            is_valid,
            days_left: Some(days_left),
            is_expiring_soon: is_valid && days_left <= EXPIRING_SOON_DAYS,
        }
    }

    /// Compute the status for a stored calendar date.
    pub fn for_date(expiry: Option<NaiveDate>, now: DateTime<Utc>) -> Self {
        Self::compute(expiry.map(midnight_utc), now)
    }

    /// Compute the status for raw column text. Unparseable text counts as
    /// no expiry.
    pub fn from_raw(expiry: Option<&str>, now: DateTime<Utc>) -> Self {
        Self::compute(expiry.and_then(parse_expiry), now)
    }

    /// Whether the record has expired.
    pub fn is_expired(&self) -> bool {
        !self.is_valid
    }

    /// Display ordering: expired first, then soonest expiry, then records
    /// without an expiry.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        match (self.days_left, other.days_left) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Parse an expiry column: `YYYY-MM-DD` (midnight UTC) or RFC 3339.
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(midnight_utc(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse an expiry column down to its calendar date.
pub fn parse_expiry_date(raw: &str) -> Option<NaiveDate> {
    parse_expiry(raw).map(|dt| dt.date_naive())
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_no_expiry() {
        let status = ExpiryStatus::compute(None, now());
        assert!(status.is_valid);
        assert_eq!(status.days_left, None);
        assert!(!status.is_expiring_soon);
    }

    #[test]
    fn test_unparseable_counts_as_no_expiry() {
        assert_eq!(ExpiryStatus::from_raw(Some("soon"), now()), ExpiryStatus::NO_EXPIRY);
        assert_eq!(ExpiryStatus::from_raw(Some(""), now()), ExpiryStatus::NO_EXPIRY);
    }

    #[test]
    fn test_month_ahead() {
        let status = ExpiryStatus::from_raw(Some("2025-01-01"), now());
        assert_eq!(status.days_left, Some(31));
        assert!(status.is_valid);
        assert!(status.is_expiring_soon);
    }

    #[test]
    fn test_window_boundary() {
        let at_36 = ExpiryStatus::compute(Some(now() + Duration::days(36)), now());
        assert!(at_36.is_expiring_soon);
        let at_37 = ExpiryStatus::compute(Some(now() + Duration::days(37)), now());
        assert!(at_37.is_valid);
        assert!(!at_37.is_expiring_soon);
    }

    #[test]
    fn test_today_and_past_are_invalid() {
        let today = ExpiryStatus::compute(Some(now()), now());
        assert_eq!(today.days_left, Some(0));
        assert!(!today.is_valid);
        assert!(!today.is_expiring_soon);

        let past = ExpiryStatus::compute(Some(now() - Duration::days(3)), now());
        assert_eq!(past.days_left, Some(-3));
        assert!(past.is_expired());
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let status = ExpiryStatus::compute(Some(now() + Duration::hours(2)), now());
        assert_eq!(status.days_left, Some(1));
        assert!(status.is_valid);

        let later = ExpiryStatus::compute(Some(now() - Duration::hours(2)), now());
        assert_eq!(later.days_left, Some(0));
    }

    #[test]
    fn test_rfc3339_accepted() {
        let status = ExpiryStatus::from_raw(Some("2024-12-11T00:00:00Z"), now());
        assert_eq!(status.days_left, Some(10));
    }

    #[test]
    fn test_days_left_serializes_null() {
        let value = serde_json::to_value(ExpiryStatus::NO_EXPIRY).expect("serialize");
        assert!(value["days_left"].is_null());
    }

    #[test]
    fn test_display_order() {
        let mut statuses = vec![
            ExpiryStatus::NO_EXPIRY,
            ExpiryStatus::compute(Some(now() + Duration::days(90)), now()),
            ExpiryStatus::compute(Some(now() - Duration::days(2)), now()),
            ExpiryStatus::compute(Some(now() + Duration::days(5)), now()),
        ];
        statuses.sort_by(ExpiryStatus::display_cmp);
        let days: Vec<_> = statuses.iter().map(|s| s.days_left).collect();
        assert_eq!(days, vec![Some(-2), Some(5), Some(90), None]);
    }
}
