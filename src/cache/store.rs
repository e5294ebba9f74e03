//! Raw entry store
//!
//! The only mutable ground truth: day key → numbers logged that day.

use std::collections::BTreeMap;

/// Outcome of writing one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteOutcome {
    /// Same numbers as before; nothing to invalidate
    Unchanged,
    Changed {
        /// The day had no numbers before and has some now
        newly_populated: bool,
    },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct EntryStore {
    days: BTreeMap<String, Vec<f64>>,
}

impl EntryStore {
    pub(crate) fn from_days(days: BTreeMap<String, Vec<f64>>) -> Self {
        Self { days }
    }

    pub(crate) fn get(&self, day: &str) -> Option<&[f64]> {
        self.days.get(day).map(Vec::as_slice)
    }

    pub(crate) fn is_populated(&self, day: &str) -> bool {
        self.get(day).is_some_and(|n| !n.is_empty())
    }

    pub(crate) fn len(&self) -> usize {
        self.days.len()
    }

    pub(crate) fn same_days(&self, days: &BTreeMap<String, Vec<f64>>) -> bool {
        &self.days == days
    }

    /// Replace a day's numbers wholesale
    pub(crate) fn set(&mut self, day: String, numbers: Vec<f64>) -> WriteOutcome {
        let was_populated = self.is_populated(&day);
        if self.get(&day).is_some_and(|existing| existing == numbers.as_slice()) {
            return WriteOutcome::Unchanged;
        }
        let newly_populated = !was_populated && !numbers.is_empty();
        self.days.insert(day, numbers);
        WriteOutcome::Changed { newly_populated }
    }

    /// Days with at least one number, ascending
    pub(crate) fn populated_days(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.days
            .iter()
            .filter(|(_, n)| !n.is_empty())
            .map(|(d, n)| (d.as_str(), n.as_slice()))
    }
}
