//! Period cache manager
//!
//! Owns the raw entries, the prior-period index and one ordered cache map per
//! granularity. Reads fill only the stages a cache entry is missing; writes go
//! through the invalidation pass in `invalidation.rs`.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::cache::entry::{CacheEntry, Comparison, Running, Totals};
use crate::cache::index::PriorIndex;
use crate::cache::store::{EntryStore, WriteOutcome};
use crate::core::{
    DayEntry, Granularity, PartialStats, PeriodChildren, PeriodData, PeriodId, Stats,
    calculate_extremes, summarize,
};
use crate::error::CacheError;

/// Stats reported for days with no numbers and no cache row
///
/// Shared and read-only; never inserted into a cache map.
static EMPTY_DAY: Stats = Stats::EMPTY;

/// Lazily computed day/week/month/year/all-time statistics for one dataset
#[derive(Debug, Default)]
pub struct PeriodCache {
    store: EntryStore,
    index: PriorIndex,
    pub(super) caches: [BTreeMap<String, CacheEntry>; 4],
    pub(super) alltime: Option<Arc<PeriodData>>,
}

impl PeriodCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry, dropping all cached results
    ///
    /// Content equal to the current store leaves the cache untouched, so
    /// reloading the same dataset keeps every snapshot reference.
    pub fn set_days<I>(&mut self, entries: I) -> Result<(), CacheError>
    where
        I: IntoIterator<Item = DayEntry>,
    {
        let mut days = BTreeMap::new();
        let mut dates = BTreeMap::new();
        for entry in entries {
            let date = entry.validate()?;
            dates.insert(date, !entry.numbers.is_empty());
            days.insert(entry.date, entry.numbers);
        }

        if self.store.same_days(&days) {
            trace!(days = days.len(), "set_days: content unchanged");
            return Ok(());
        }

        // A date may repeat; the last write decides whether it is populated
        let populated = dates
            .into_iter()
            .filter_map(|(date, populated)| populated.then_some(date));

        self.store = EntryStore::from_days(days);
        self.index = PriorIndex::build(populated);
        self.caches = Default::default();
        self.alltime = None;

        debug!(
            days = self.store.len(),
            weeks = self.index.len(Granularity::Week),
            months = self.index.len(Granularity::Month),
            years = self.index.len(Granularity::Year),
            "set_days: rebuilt prior-period index"
        );
        Ok(())
    }

    /// Replace one day's numbers
    ///
    /// Writing the numbers a day already has is a no-op.
    pub fn set_day(&mut self, entry: DayEntry) -> Result<(), CacheError> {
        let date = entry.validate()?;
        let day = entry.date.clone();

        match self.store.set(entry.date, entry.numbers) {
            WriteOutcome::Unchanged => {
                trace!(day = %day, "set_day: numbers unchanged");
                return Ok(());
            }
            WriteOutcome::Changed { newly_populated } => {
                // The index must see the new day before later periods are
                // invalidated against it
                if newly_populated && self.index.insert_day(date) {
                    trace!(day = %day, "set_day: index gained a period");
                }
            }
        }

        self.invalidate_day(date);
        Ok(())
    }

    /// Raw numbers logged for a day
    pub fn get_day(&self, day: &str) -> Option<&[f64]> {
        self.store.get(day)
    }

    /// Number of days in the store, populated or not
    pub fn day_count(&self) -> usize {
        self.store.len()
    }

    /// Keys with at least one populated day, ascending
    pub fn populated_keys(&self, granularity: Granularity) -> impl Iterator<Item = &str> {
        self.index.keys(granularity)
    }

    pub fn day_data(&mut self, key: &str) -> Result<Arc<PeriodData>, CacheError> {
        self.period_data(Granularity::Day, key)
    }

    pub fn week_data(&mut self, key: &str) -> Result<Arc<PeriodData>, CacheError> {
        self.period_data(Granularity::Week, key)
    }

    pub fn month_data(&mut self, key: &str) -> Result<Arc<PeriodData>, CacheError> {
        self.period_data(Granularity::Month, key)
    }

    pub fn year_data(&mut self, key: &str) -> Result<Arc<PeriodData>, CacheError> {
        self.period_data(Granularity::Year, key)
    }

    /// Complete statistics for one period
    ///
    /// Returns the same `Arc` as the previous call unless a write since then
    /// changed something this period depends on.
    pub fn period_data(
        &mut self,
        granularity: Granularity,
        key: &str,
    ) -> Result<Arc<PeriodData>, CacheError> {
        if let Some(snapshot) = self.entry_mut(granularity, key)?.snapshot() {
            return Ok(Arc::clone(snapshot));
        }

        self.comparison(granularity, key)?;
        self.running(granularity, key)?;
        self.extremes(granularity, key)?;

        let data = self.entry_mut(granularity, key)?.complete();
        Ok(data.unwrap_or_else(|| {
            panic!("{granularity} {key}: cache entry incomplete after filling every stage")
        }))
    }

    /// Statistics over every entry in the store
    pub fn alltime_data(&mut self) -> Arc<PeriodData> {
        if let Some(data) = &self.alltime {
            return Arc::clone(data);
        }

        let days: Vec<String> = self
            .store
            .populated_days()
            .map(|(d, _)| d.to_string())
            .collect();
        let numbers: Vec<f64> = self
            .store
            .populated_days()
            .flat_map(|(_, n)| n.iter().copied())
            .collect();
        let stats = summarize(&numbers).unwrap_or(Stats::EMPTY);
        let day_stats: Vec<Stats> = days.iter().map(|d| self.day_stats(d)).collect();

        let children = PeriodChildren {
            days,
            weeks: self.index.keys(Granularity::Week).map(str::to_string).collect(),
            months: self.index.keys(Granularity::Month).map(str::to_string).collect(),
        };

        let data = Arc::new(PeriodData {
            id: PeriodId::AllTime,
            children: Arc::new(children),
            numbers: numbers.into(),
            stats,
            deltas: Stats::EMPTY,
            percents: PartialStats::default(),
            cumulatives: stats,
            cumulative_deltas: Stats::EMPTY,
            cumulative_percents: PartialStats::default(),
            extremes: calculate_extremes(&day_stats),
        });
        self.alltime = Some(Arc::clone(&data));
        data
    }

    /// Cache row for a key, created on first access
    fn entry_mut(
        &mut self,
        granularity: Granularity,
        key: &str,
    ) -> Result<&mut CacheEntry, CacheError> {
        row(&mut self.caches[granularity.index()], granularity, key)
    }

    /// Numbers and stats; days read their own entry, larger periods flatten
    /// their child days in date order
    pub(super) fn totals(
        &mut self,
        granularity: Granularity,
        key: &str,
    ) -> Result<Totals, CacheError> {
        let store = &self.store;
        let entry = row(&mut self.caches[granularity.index()], granularity, key)?;
        if let Some(totals) = &entry.totals {
            return Ok(totals.clone());
        }

        let numbers = match granularity {
            Granularity::Day => store.get(key).map(<[f64]>::to_vec).unwrap_or_default(),
            _ => entry
                .children
                .days
                .iter()
                .filter_map(|d| store.get(d))
                .flatten()
                .copied()
                .collect(),
        };
        let totals = Totals::from_numbers(numbers);
        entry.totals = Some(totals.clone());
        Ok(totals)
    }

    /// Stats of one day for extremes, without creating rows for empty days
    fn day_stats(&mut self, day: &str) -> Stats {
        if let Some(totals) = self.caches[Granularity::Day.index()]
            .get(day)
            .and_then(|e| e.totals.as_ref())
        {
            return totals.stats;
        }
        if !self.store.is_populated(day) {
            return EMPTY_DAY;
        }
        self.totals(Granularity::Day, day)
            .map(|t| t.stats)
            .unwrap_or(EMPTY_DAY)
    }

    /// Deltas and percents against the nearest earlier populated period
    fn comparison(
        &mut self,
        granularity: Granularity,
        key: &str,
    ) -> Result<Comparison, CacheError> {
        if let Some(comparison) = self.entry_mut(granularity, key)?.comparison {
            return Ok(comparison);
        }

        let totals = self.totals(granularity, key)?;
        let mut baseline = None;
        let mut cursor = self.index.prior(granularity, key).map(str::to_string);
        while let Some(prior) = cursor {
            let prior_totals = self.totals(granularity, &prior)?;
            // The index only holds populated periods, but a day emptied since
            // it was indexed still has a key there
            if prior_totals.stats.is_populated() {
                baseline = Some(prior_totals.stats);
                break;
            }
            cursor = self.index.prior(granularity, &prior).map(str::to_string);
        }

        let comparison = Comparison::against(&totals, baseline.as_ref());
        self.entry_mut(granularity, key)?.comparison = Some(comparison);
        Ok(comparison)
    }

    /// Cumulative summary, walking back only to the nearest memoized period
    fn running(&mut self, granularity: Granularity, key: &str) -> Result<Running, CacheError> {
        let limit = self.index.len(granularity) + 1;
        let mut chain: Vec<String> = Vec::new();
        let mut boundary = None;
        let mut cursor = Some(key.to_string());

        while let Some(current) = cursor {
            if let Some(running) = self.entry_mut(granularity, &current)?.running {
                boundary = Some(running);
                break;
            }
            cursor = self.index.prior(granularity, &current).map(str::to_string);
            chain.push(current);
            assert!(
                chain.len() <= limit,
                "prior-period index for {granularity} does not terminate below {key}"
            );
        }

        trace!(%granularity, key, recomputed = chain.len(), "running totals");

        let mut previous = boundary;
        for current in chain.iter().rev() {
            let totals = self.totals(granularity, current)?;
            // A prior whose days were all cleared carries nothing over
            let running = match &previous {
                Some(prior) if prior.cumulatives.is_populated() => {
                    Running::after(prior, &totals.numbers)
                }
                _ => Running::first(totals.stats),
            };
            self.entry_mut(granularity, current)?.running = Some(running);
            previous = Some(running);
        }
        Ok(previous.unwrap_or_default())
    }

    /// Min/max across child days; days themselves have none
    fn extremes(&mut self, granularity: Granularity, key: &str) -> Result<(), CacheError> {
        let entry = self.entry_mut(granularity, key)?;
        if entry.extremes.is_some() {
            return Ok(());
        }
        if granularity == Granularity::Day {
            entry.extremes = Some(None);
            return Ok(());
        }

        let children = Arc::clone(&entry.children);
        let stats: Vec<Stats> = children
            .days
            .iter()
            .map(|d| self.day_stats(d))
            .filter(Stats::is_populated)
            .collect();
        self.entry_mut(granularity, key)?.extremes = Some(calculate_extremes(&stats));
        Ok(())
    }

    #[cfg(test)]
    pub(super) fn cached_rows(&self, granularity: Granularity) -> usize {
        self.caches[granularity.index()].len()
    }
}

fn row<'a>(
    map: &'a mut BTreeMap<String, CacheEntry>,
    granularity: Granularity,
    key: &str,
) -> Result<&'a mut CacheEntry, CacheError> {
    match map.entry(key.to_string()) {
        Entry::Occupied(occupied) => Ok(occupied.into_mut()),
        Entry::Vacant(vacant) => Ok(vacant.insert(CacheEntry::new(key, granularity)?)),
    }
}
