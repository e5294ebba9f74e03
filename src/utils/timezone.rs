use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use daytally::AppError;

/// Zone that decides which calendar day `today` reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Timezone::Local),
            Some(raw) if raw.eq_ignore_ascii_case("local") => Ok(Timezone::Local),
            Some(raw) if raw.eq_ignore_ascii_case("utc") => Ok(Timezone::Named(chrono_tz::UTC)),
            Some(raw) => raw
                .parse::<Tz>()
                .map(Timezone::Named)
                .map_err(|_| AppError::InvalidTimezone {
                    input: raw.to_string(),
                }),
        }
    }

    pub(crate) fn today(self) -> NaiveDate {
        self.day_of(Utc::now())
    }

    fn day_of(self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Timezone::Local => instant.with_timezone(&Local).date_naive(),
            Timezone::Named(tz) => instant.with_timezone(&tz).date_naive(),
        }
    }
}
