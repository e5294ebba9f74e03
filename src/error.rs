use std::path::PathBuf;

use thiserror::Error;

use crate::core::Granularity;

/// Errors raised by the period cache itself
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid {granularity} key \"{input}\" (expected {})", .granularity.key_format())]
    InvalidKey {
        granularity: Granularity,
        input: String,
    },

    #[error("Non-finite number {value} on {date}")]
    NonFiniteNumber { date: String, value: f64 },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Invalid --set value \"{input}\" (expected YYYY-MM-DD=N[,N...])")]
    InvalidSet { input: String },

    #[error("Unrecognized period key \"{input}\"")]
    UnknownKey { input: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid data pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("{0}")]
    Cache(#[from] CacheError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_error_display_invalid_key() {
        let e = CacheError::InvalidKey {
            granularity: Granularity::Week,
            input: "2025-52".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid week key "2025-52" (expected YYYY-Www)"#
        );
    }

    #[test]
    fn cache_error_display_non_finite() {
        let e = CacheError::NonFiniteNumber {
            date: "2025-01-01".to_string(),
            value: f64::INFINITY,
        };
        assert_eq!(e.to_string(), "Non-finite number inf on 2025-01-01");
    }

    #[test]
    fn app_error_display_date() {
        let e = AppError::InvalidDate {
            input: "abc".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid date "abc" (expected YYYYMMDD or YYYY-MM-DD)"#
        );
    }

    #[test]
    fn app_error_display_timezone() {
        let e = AppError::InvalidTimezone {
            input: "Mars/Olympus".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn app_error_display_set() {
        let e = AppError::InvalidSet {
            input: "2025-01-01".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"Invalid --set value "2025-01-01" (expected YYYY-MM-DD=N[,N...])"#
        );
    }

    #[test]
    fn app_error_from_cache_error() {
        let cache = CacheError::InvalidKey {
            granularity: Granularity::Day,
            input: "bad".to_string(),
        };
        let app: AppError = cache.into();
        assert_eq!(
            app.to_string(),
            r#"Invalid day key "bad" (expected YYYY-MM-DD)"#
        );
    }

    #[test]
    fn app_error_io_mentions_path() {
        let e = AppError::Io {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(e.to_string(), "Failed to read /tmp/missing.json: gone");
    }
}
