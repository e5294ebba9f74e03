//! daytally - per-day number log with cached period statistics
//!
//! [`PeriodCache`] holds the day entries of one dataset and answers
//! day/week/month/year/all-time queries, computing each derived value on
//! first use and recomputing only what a write actually affects.

pub mod cache;
pub(crate) mod consts;
pub mod core;
pub mod error;
pub mod source;

pub use crate::cache::PeriodCache;
pub use crate::core::{DayEntry, Granularity, PeriodData, PeriodId, Stats};
pub use crate::error::{AppError, CacheError};
