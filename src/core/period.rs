//! Calendar key algebra
//!
//! Keys are zero-padded strings, so string order is chronological order
//! within one granularity:
//! - day `YYYY-MM-DD`
//! - week `YYYY-Www` (ISO-8601 week-year and week number)
//! - month `YYYY-MM`
//! - year `YYYY`

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consts::DATE_FORMAT;
use crate::error::CacheError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    /// Slot of this granularity in per-granularity arrays
    pub(crate) fn index(self) -> usize {
        match self {
            Granularity::Day => 0,
            Granularity::Week => 1,
            Granularity::Month => 2,
            Granularity::Year => 3,
        }
    }

    pub fn key_format(self) -> &'static str {
        match self {
            Granularity::Day => "YYYY-MM-DD",
            Granularity::Week => "YYYY-Www",
            Granularity::Month => "YYYY-MM",
            Granularity::Year => "YYYY",
        }
    }

    /// Guess the granularity from the shape of a key
    pub fn detect(key: &str) -> Option<Granularity> {
        Granularity::ALL
            .into_iter()
            .find(|&g| validate_key(key, g).is_ok())
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        };
        f.write_str(name)
    }
}

fn invalid(granularity: Granularity, input: &str) -> CacheError {
    CacheError::InvalidKey {
        granularity,
        input: input.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(digits: &str) -> Option<T> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parse a strictly zero-padded `YYYY-MM-DD` key
pub fn parse_day_key(key: &str) -> Result<NaiveDate, CacheError> {
    let date = NaiveDate::parse_from_str(key, DATE_FORMAT)
        .map_err(|_| invalid(Granularity::Day, key))?;
    // chrono accepts unpadded fields; the ordering contract does not
    if date.format(DATE_FORMAT).to_string() != key {
        return Err(invalid(Granularity::Day, key));
    }
    Ok(date)
}

fn parse_week_key(key: &str) -> Option<NaiveDate> {
    let (year, week) = key.split_once("-W")?;
    if year.len() != 4 || week.len() != 2 {
        return None;
    }
    let year: i32 = parse_number(year)?;
    let week: u32 = parse_number(week)?;
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

fn parse_month_key(key: &str) -> Option<NaiveDate> {
    let (year, month) = key.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(parse_number(year)?, parse_number(month)?, 1)
}

fn parse_year_key(key: &str) -> Option<NaiveDate> {
    if key.len() != 4 {
        return None;
    }
    NaiveDate::from_ymd_opt(parse_number(key)?, 1, 1)
}

/// First day covered by a key of the given granularity
fn first_day(key: &str, granularity: Granularity) -> Result<NaiveDate, CacheError> {
    match granularity {
        Granularity::Day => parse_day_key(key),
        Granularity::Week => parse_week_key(key).ok_or_else(|| invalid(granularity, key)),
        Granularity::Month => parse_month_key(key).ok_or_else(|| invalid(granularity, key)),
        Granularity::Year => parse_year_key(key).ok_or_else(|| invalid(granularity, key)),
    }
}

pub fn validate_key(key: &str, granularity: Granularity) -> Result<(), CacheError> {
    first_day(key, granularity).map(|_| ())
}

/// Key of the period of `granularity` that contains `date`
pub fn period_of(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.format(DATE_FORMAT).to_string(),
        Granularity::Week => {
            let iso = date.iso_week();
            format!("{:04}-W{:02}", iso.year(), iso.week())
        }
        Granularity::Month => date.format("%Y-%m").to_string(),
        Granularity::Year => format!("{:04}", date.year()),
    }
}

/// Convert a day key to the key of its containing period
pub fn convert_key(day: &str, granularity: Granularity) -> Result<String, CacheError> {
    Ok(period_of(parse_day_key(day)?, granularity))
}

/// Inclusive first and last day of a period
pub fn period_bounds(
    key: &str,
    granularity: Granularity,
) -> Result<(NaiveDate, NaiveDate), CacheError> {
    let start = first_day(key, granularity)?;
    let end = match granularity {
        Granularity::Day => start,
        Granularity::Week => start + Duration::days(6),
        Granularity::Month => {
            let (y, m) = if start.month() == 12 {
                (start.year() + 1, 1)
            } else {
                (start.year(), start.month() + 1)
            };
            NaiveDate::from_ymd_opt(y, m, 1)
                .and_then(|next| next.pred_opt())
                .ok_or_else(|| invalid(granularity, key))?
        }
        Granularity::Year => NaiveDate::from_ymd_opt(start.year(), 12, 31)
            .ok_or_else(|| invalid(granularity, key))?,
    };
    Ok((start, end))
}

/// Every day key inside a period, ascending
pub fn child_days(key: &str, granularity: Granularity) -> Result<Vec<String>, CacheError> {
    let (start, end) = period_bounds(key, granularity)?;
    Ok(start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| period_of(d, Granularity::Day))
        .collect())
}

/// Week keys that overlap a month or year, ascending
pub fn child_weeks(key: &str, granularity: Granularity) -> Result<Vec<String>, CacheError> {
    if matches!(granularity, Granularity::Day | Granularity::Week) {
        return Ok(Vec::new());
    }
    let mut weeks = child_days(key, granularity)?
        .iter()
        .filter_map(|d| convert_key(d, Granularity::Week).ok())
        .collect::<Vec<_>>();
    weeks.dedup();
    Ok(weeks)
}

/// Month keys of a year
pub fn child_months(key: &str, granularity: Granularity) -> Result<Vec<String>, CacheError> {
    if granularity != Granularity::Year {
        return Ok(Vec::new());
    }
    let year = first_day(key, granularity)?.year();
    Ok((1..=12).map(|m| format!("{year:04}-{m:02}")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_key_accepts_padded() {
        let d = parse_day_key("2025-01-05").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
    }

    #[test]
    fn parse_day_key_rejects_unpadded_and_garbage() {
        assert!(parse_day_key("2025-1-5").is_err());
        assert!(parse_day_key("20250105").is_err());
        assert!(parse_day_key("2025-02-30").is_err());
        assert!(parse_day_key("not-a-date").is_err());
    }

    #[test]
    fn convert_key_all_granularities() {
        assert_eq!(convert_key("2025-03-15", Granularity::Day).unwrap(), "2025-03-15");
        assert_eq!(convert_key("2025-03-15", Granularity::Week).unwrap(), "2025-W11");
        assert_eq!(convert_key("2025-03-15", Granularity::Month).unwrap(), "2025-03");
        assert_eq!(convert_key("2025-03-15", Granularity::Year).unwrap(), "2025");
    }

    #[test]
    fn convert_key_iso_week_crosses_year() {
        // 2024-12-30 is the Monday of ISO week 1 of 2025
        assert_eq!(convert_key("2024-12-30", Granularity::Week).unwrap(), "2025-W01");
        // 2021-01-03 still belongs to the last week of 2020
        assert_eq!(convert_key("2021-01-03", Granularity::Week).unwrap(), "2020-W53");
    }

    #[test]
    fn child_days_of_week_starts_monday() {
        let days = child_days("2025-W01", Granularity::Week).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], "2024-12-30");
        assert_eq!(days[6], "2025-01-05");
    }

    #[test]
    fn child_days_of_month_handles_leap_year() {
        assert_eq!(child_days("2024-02", Granularity::Month).unwrap().len(), 29);
        assert_eq!(child_days("2025-02", Granularity::Month).unwrap().len(), 28);
        let dec = child_days("2025-12", Granularity::Month).unwrap();
        assert_eq!(dec.last().map(String::as_str), Some("2025-12-31"));
    }

    #[test]
    fn child_days_of_year() {
        let days = child_days("2024", Granularity::Year).unwrap();
        assert_eq!(days.len(), 366);
        assert_eq!(days[0], "2024-01-01");
    }

    #[test]
    fn child_weeks_of_month() {
        // January 2025 touches ISO weeks 1 through 5
        let weeks = child_weeks("2025-01", Granularity::Month).unwrap();
        assert_eq!(weeks, vec!["2025-W01", "2025-W02", "2025-W03", "2025-W04", "2025-W05"]);
        assert!(child_weeks("2025-W01", Granularity::Week).unwrap().is_empty());
    }

    #[test]
    fn child_months_of_year() {
        let months = child_months("2025", Granularity::Year).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], "2025-01");
        assert_eq!(months[11], "2025-12");
        assert!(child_months("2025-01", Granularity::Month).unwrap().is_empty());
    }

    #[test]
    fn invalid_keys_are_rejected() {
        assert!(validate_key("2025-W54", Granularity::Week).is_err());
        assert!(validate_key("2025-W1", Granularity::Week).is_err());
        assert!(validate_key("2025-13", Granularity::Month).is_err());
        assert!(validate_key("25", Granularity::Year).is_err());
        assert!(validate_key("+202", Granularity::Year).is_err());
    }

    #[test]
    fn detect_granularity_from_shape() {
        assert_eq!(Granularity::detect("2025-01-01"), Some(Granularity::Day));
        assert_eq!(Granularity::detect("2025-W07"), Some(Granularity::Week));
        assert_eq!(Granularity::detect("2025-07"), Some(Granularity::Month));
        assert_eq!(Granularity::detect("2025"), Some(Granularity::Year));
        assert_eq!(Granularity::detect("yesterday"), None);
    }

    #[test]
    fn keys_sort_chronologically() {
        let mut weeks = vec!["2025-W10", "2024-W52", "2025-W02"];
        weeks.sort();
        assert_eq!(weeks, vec!["2024-W52", "2025-W02", "2025-W10"]);
    }
}
