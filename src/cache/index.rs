//! Prior-period index
//!
//! For each granularity, the ordered set of period keys that contain at least
//! one populated day. The prior of a key is the greatest member strictly
//! below it, so empty gaps are skipped without storing explicit links.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use crate::core::{Granularity, period_of};

#[derive(Debug, Default, Clone)]
pub(crate) struct PriorIndex {
    keys: [BTreeSet<String>; 4],
}

impl PriorIndex {
    /// Build from populated days; one sort per granularity
    pub(crate) fn build(days: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut dates: Vec<NaiveDate> = days.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();

        let mut index = PriorIndex::default();
        for granularity in Granularity::ALL {
            let mut keys: Vec<String> = dates.iter().map(|d| period_of(*d, granularity)).collect();
            keys.sort_unstable();
            keys.dedup();
            index.keys[granularity.index()] = keys.into_iter().collect();
        }
        index
    }

    /// Register a newly populated day at every granularity
    ///
    /// Returns true if any granularity gained a key.
    pub(crate) fn insert_day(&mut self, day: NaiveDate) -> bool {
        let mut changed = false;
        for granularity in Granularity::ALL {
            changed |= self.keys[granularity.index()].insert(period_of(day, granularity));
        }
        changed
    }

    /// Nearest populated key strictly before `key`
    pub(crate) fn prior(&self, granularity: Granularity, key: &str) -> Option<&str> {
        self.keys[granularity.index()]
            .range::<str, _>((Unbounded, Excluded(key)))
            .next_back()
            .map(String::as_str)
    }

    pub(crate) fn len(&self, granularity: Granularity) -> usize {
        self.keys[granularity.index()].len()
    }

    pub(crate) fn keys(&self, granularity: Granularity) -> impl Iterator<Item = &str> {
        self.keys[granularity.index()].iter().map(String::as_str)
    }
}
