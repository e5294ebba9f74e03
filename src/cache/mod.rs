//! Hierarchical period cache
//!
//! Lazily derived statistics per day/week/month/year/all-time over a sparse
//! set of day entries, with targeted invalidation on writes.

mod engine;
mod entry;
mod index;
mod invalidation;
mod store;

pub use engine::PeriodCache;
