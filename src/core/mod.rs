//! Core module - calendar keys, statistics and shared data types

pub mod period;
pub mod stats;
mod types;

pub use period::{
    Granularity, child_days, child_months, child_weeks, convert_key, parse_day_key,
    period_bounds, period_of, validate_key,
};
pub use stats::{Extremes, PartialStats, Stats, calculate_extremes, delta, percent_change, summarize};
pub use types::{DateFilter, DayEntry, PeriodChildren, PeriodData, PeriodId};
