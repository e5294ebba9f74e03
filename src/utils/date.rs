use chrono::NaiveDate;
use daytally::{AppError, DayEntry};

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Parse a `--set` value: `YYYY-MM-DD=N[,N...]`
///
/// Nothing after `=` clears the day. The date itself is checked by the cache.
pub(crate) fn parse_set(raw: &str) -> Result<DayEntry, AppError> {
    let invalid = || AppError::InvalidSet {
        input: raw.to_string(),
    };
    let (date, values) = raw.split_once('=').ok_or_else(invalid)?;
    let date = date.trim();
    if date.is_empty() {
        return Err(invalid());
    }

    let values = values.trim();
    let numbers = if values.is_empty() {
        Vec::new()
    } else {
        values
            .split(',')
            .map(|v| v.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(DayEntry::new(date, numbers))
}
