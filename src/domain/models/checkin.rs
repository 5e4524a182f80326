use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRecord {
    pub id: String,
    pub guest_id: String,
    pub checkin_at: DateTime<Utc>,
    pub checkout_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl CheckinRecord {
    pub fn new(guest_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            guest_id,
            checkin_at: Utc::now(),
            checkout_at: None,
            is_active: true,
        }
    }

    pub fn close(&mut self) {
        self.checkout_at = Some(Utc::now());
        self.is_active = false;
    }
}

/// Check-in history row joined with the guest it belongs to.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckinHistoryEntry {
    pub id: String,
    pub guest_id: String,
    pub guest_name: String,
    pub guest_display_id: i64,
    pub checkin_at: DateTime<Utc>,
    pub checkout_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CheckinFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub guest_name: Option<String>,
}

impl CheckinFilter {
    /// Lower bound (inclusive) on `checkin_at`.
    pub fn from_instant(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Upper bound (exclusive) on `checkin_at`: midnight after `end_date`.
    pub fn until_instant(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|d| d.succ_opt())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_marks_record_inactive() {
        let mut record = CheckinRecord::new("g1".into());
        assert!(record.is_active);
        assert!(record.checkout_at.is_none());

        record.close();
        assert!(!record.is_active);
        assert!(record.checkout_at.unwrap() >= record.checkin_at);
    }

    #[test]
    fn test_filter_bounds_cover_whole_days() {
        let filter = CheckinFilter {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 31),
            guest_name: None,
        };
        assert_eq!(filter.from_instant().unwrap().to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert_eq!(filter.until_instant().unwrap().to_rfc3339(), "2026-04-01T00:00:00+00:00");
        assert!(CheckinFilter::default().from_instant().is_none());
    }
}
