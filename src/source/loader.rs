//! JSON entry loader
//!
//! Reads day entries from a single file or from every `*.json` file under a
//! directory. Files are parsed in parallel and merged in path order.

use rayon::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

use crate::core::DayEntry;
use crate::error::AppError;

/// Accepted file layouts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntryFile {
    /// `[{"date": "2025-01-01", "numbers": [1, 2]}]`
    List(Vec<DayEntry>),
    /// `{"2025-01-01": [1, 2]}`
    Map(BTreeMap<String, Vec<f64>>),
}

impl EntryFile {
    fn into_entries(self) -> Vec<DayEntry> {
        match self {
            EntryFile::List(entries) => entries,
            EntryFile::Map(days) => days
                .into_iter()
                .map(|(date, numbers)| DayEntry { date, numbers })
                .collect(),
        }
    }
}

/// Parse one file
pub fn parse_file(path: &Path) -> Result<Vec<DayEntry>, AppError> {
    let content = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: EntryFile = serde_json::from_str(&content).map_err(|source| AppError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.into_entries())
}

/// All `*.json` files below `dir`, sorted
pub fn find_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let pattern = format!(
        "{}/**/*.json",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(Result::ok).collect();
    files.sort();
    Ok(files)
}

/// Concatenate numbers of repeated dates, keeping first-seen order per date
fn merge(batches: Vec<Vec<DayEntry>>) -> Vec<DayEntry> {
    let mut days: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for entry in batches.into_iter().flatten() {
        days.entry(entry.date).or_default().extend(entry.numbers);
    }
    days.into_iter()
        .map(|(date, numbers)| DayEntry { date, numbers })
        .collect()
}

/// Load entries from a file or a directory of files
///
/// A missing path is an empty dataset, not an error.
pub fn load_entries(path: &Path) -> Result<Vec<DayEntry>, AppError> {
    if !path.exists() {
        warn!(path = %path.display(), "data path does not exist");
        return Ok(Vec::new());
    }
    if path.is_file() {
        return Ok(merge(vec![parse_file(path)?]));
    }

    let discovery_start = Instant::now();
    let files = find_files(path)?;
    debug!(
        files = files.len(),
        elapsed_ms = discovery_start.elapsed().as_secs_f64() * 1000.0,
        "discovered entry files"
    );

    let parse_start = Instant::now();
    let batches = files
        .par_iter()
        .map(|file| parse_file(file))
        .collect::<Result<Vec<_>, _>>()?;
    let entries = merge(batches);
    debug!(
        days = entries.len(),
        elapsed_ms = parse_start.elapsed().as_secs_f64() * 1000.0,
        "parsed entry files"
    );
    Ok(entries)
}
