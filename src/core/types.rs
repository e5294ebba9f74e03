//! Core data types shared by the cache, the loader and the outputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::core::period::{Granularity, parse_day_key};
use crate::core::stats::{Extremes, PartialStats, Stats};
use crate::error::CacheError;

/// Numbers logged for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    /// Day key (YYYY-MM-DD)
    pub date: String,
    pub numbers: Vec<f64>,
}

impl DayEntry {
    pub fn new(date: impl Into<String>, numbers: Vec<f64>) -> Self {
        Self {
            date: date.into(),
            numbers,
        }
    }

    /// Check the key and the numbers, returning the parsed date
    pub(crate) fn validate(&self) -> Result<NaiveDate, CacheError> {
        let date = parse_day_key(&self.date)?;
        if let Some(&value) = self.numbers.iter().find(|n| !n.is_finite()) {
            return Err(CacheError::NonFiniteNumber {
                date: self.date.clone(),
                value,
            });
        }
        Ok(date)
    }
}

/// Which period a [`PeriodData`] describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "lowercase")]
pub enum PeriodId {
    Keyed {
        granularity: Granularity,
        key: String,
    },
    #[serde(rename = "alltime")]
    AllTime,
}

impl PeriodId {
    pub fn key(&self) -> Option<&str> {
        match self {
            PeriodId::Keyed { key, .. } => Some(key),
            PeriodId::AllTime => None,
        }
    }

    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            PeriodId::Keyed { granularity, .. } => Some(*granularity),
            PeriodId::AllTime => None,
        }
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodId::Keyed { key, .. } => f.write_str(key),
            PeriodId::AllTime => f.write_str("all-time"),
        }
    }
}

/// Finer-grained keys contained in a period
///
/// Pure function of the period key, so it is computed once per cache entry.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodChildren {
    pub days: Vec<String>,
    pub weeks: Vec<String>,
    pub months: Vec<String>,
}

/// Fully computed statistics for one period
///
/// Handed out as `Arc<PeriodData>`; an unchanged period yields the same
/// allocation, so `Arc::ptr_eq` tells callers nothing changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodData {
    #[serde(flatten)]
    pub id: PeriodId,
    pub children: Arc<PeriodChildren>,
    pub numbers: Arc<[f64]>,
    pub stats: Stats,
    /// Change against the nearest earlier populated period
    pub deltas: Stats,
    pub percents: PartialStats,
    /// Running summary from the earliest populated period through this one
    pub cumulatives: Stats,
    pub cumulative_deltas: Stats,
    pub cumulative_percents: PartialStats,
    /// Min/max across child days; absent for days and single-child periods
    pub extremes: Option<Extremes>,
}

/// Date filter for queries
#[derive(Debug, Clone, Default)]
pub struct DateFilter {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateFilter {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    /// True if the inclusive range `start..=end` intersects the filter
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        if let Some(s) = self.since
            && end < s
        {
            return false;
        }
        if let Some(u) = self.until
            && start > u
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // --- DayEntry ---

    #[test]
    fn day_entry_validate_ok() {
        let e = DayEntry::new("2025-01-15", vec![1.0, 2.5]);
        assert_eq!(e.validate().unwrap(), d(2025, 1, 15));
    }

    #[test]
    fn day_entry_validate_rejects_bad_key() {
        let e = DayEntry::new("2025-1-15", vec![1.0]);
        assert!(matches!(e.validate(), Err(CacheError::InvalidKey { .. })));
    }

    #[test]
    fn day_entry_validate_rejects_nan() {
        let e = DayEntry::new("2025-01-15", vec![1.0, f64::NAN]);
        assert!(matches!(
            e.validate(),
            Err(CacheError::NonFiniteNumber { .. })
        ));
    }

    #[test]
    fn day_entry_empty_numbers_are_valid() {
        assert!(DayEntry::new("2025-01-15", Vec::new()).validate().is_ok());
    }

    #[test]
    fn day_entry_deserializes() {
        let e: DayEntry =
            serde_json::from_str(r#"{"date":"2025-01-01","numbers":[3,4.5]}"#).unwrap();
        assert_eq!(e, DayEntry::new("2025-01-01", vec![3.0, 4.5]));
    }

    // --- PeriodId ---

    #[test]
    fn period_id_display() {
        let id = PeriodId::Keyed {
            granularity: Granularity::Month,
            key: "2025-04".into(),
        };
        assert_eq!(id.to_string(), "2025-04");
        assert_eq!(id.key(), Some("2025-04"));
        assert_eq!(PeriodId::AllTime.to_string(), "all-time");
        assert_eq!(PeriodId::AllTime.granularity(), None);
    }

    #[test]
    fn period_id_serializes_tagged() {
        let id = PeriodId::Keyed {
            granularity: Granularity::Week,
            key: "2025-W03".into(),
        };
        let v = serde_json::to_value(&id).unwrap();
        assert_eq!(v["period"], "keyed");
        assert_eq!(v["granularity"], "week");
        assert_eq!(v["key"], "2025-W03");
        let all = serde_json::to_value(PeriodId::AllTime).unwrap();
        assert_eq!(all["period"], "alltime");
    }

    // --- DateFilter ---

    #[test]
    fn date_filter_no_bounds() {
        let f = DateFilter::new(None, None);
        assert!(f.overlaps(d(2020, 1, 1), d(2020, 1, 1)));
        assert!(f.overlaps(d(2099, 12, 31), d(2099, 12, 31)));
    }

    #[test]
    fn date_filter_since_only() {
        let f = DateFilter::new(Some(d(2025, 6, 1)), None);
        assert!(!f.overlaps(d(2025, 5, 31), d(2025, 5, 31)));
        assert!(f.overlaps(d(2025, 6, 1), d(2025, 6, 1))); // inclusive
        assert!(f.overlaps(d(2025, 6, 2), d(2025, 6, 2)));
    }

    #[test]
    fn date_filter_until_only() {
        let f = DateFilter::new(None, Some(d(2025, 6, 30)));
        assert!(f.overlaps(d(2025, 6, 30), d(2025, 6, 30))); // inclusive
        assert!(!f.overlaps(d(2025, 7, 1), d(2025, 7, 1)));
    }

    #[test]
    fn date_filter_overlap_partial_range() {
        let f = DateFilter::new(Some(d(2025, 3, 10)), Some(d(2025, 3, 20)));
        // Month of March overlaps the window
        assert!(f.overlaps(d(2025, 3, 1), d(2025, 3, 31)));
        // A week ending before the window does not
        assert!(!f.overlaps(d(2025, 3, 1), d(2025, 3, 9)));
        // A week starting after it does not either
        assert!(!f.overlaps(d(2025, 3, 21), d(2025, 3, 27)));
    }
}
