//! Data source for day entries
//!
//! Entries live in JSON files; see [`loader`] for the accepted layouts.

pub mod loader;

pub use loader::load_entries;
