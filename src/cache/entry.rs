//! One cache row per (granularity, key)
//!
//! Derived values are grouped by stage. Each stage is filled lazily and
//! cleared independently by the invalidation pass:
//! totals → comparison → running, with extremes on the side.

use std::sync::Arc;

use crate::core::{
    Extremes, Granularity, PartialStats, PeriodChildren, PeriodData, PeriodId, Stats,
    child_days, child_months, child_weeks, delta, percent_change, summarize,
};
use crate::error::CacheError;

/// Raw numbers of a period and their summary
#[derive(Debug, Clone)]
pub(crate) struct Totals {
    pub(crate) numbers: Arc<[f64]>,
    pub(crate) stats: Stats,
}

impl Totals {
    pub(crate) fn from_numbers(numbers: Vec<f64>) -> Self {
        let stats = summarize(&numbers).unwrap_or(Stats::EMPTY);
        Self {
            numbers: numbers.into(),
            stats,
        }
    }
}

/// Change against the prior populated period
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Comparison {
    pub(crate) deltas: Stats,
    pub(crate) percents: PartialStats,
}

impl Comparison {
    /// Compare `totals` with the prior period's stats
    ///
    /// Without a prior, measure drift inside the period instead: its last
    /// value against a baseline seeded from its first value.
    pub(crate) fn against(totals: &Totals, baseline: Option<&Stats>) -> Self {
        let (Some(first), Some(last)) = (totals.numbers.first(), totals.numbers.last()) else {
            return Self::default();
        };
        let (current, baseline) = match baseline {
            Some(b) => (totals.stats, *b),
            None => (
                summarize(&[*last]).unwrap_or(Stats::EMPTY),
                summarize(&[*first]).unwrap_or(Stats::EMPTY),
            ),
        };
        Self {
            deltas: delta(&current, &baseline),
            percents: percent_change(&current, &baseline),
        }
    }
}

/// Running summary chained across every earlier period
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Running {
    pub(crate) cumulatives: Stats,
    pub(crate) cumulative_deltas: Stats,
    pub(crate) cumulative_percents: PartialStats,
}

impl Running {
    /// Head of a chain: nothing earlier to carry over
    pub(crate) fn first(stats: Stats) -> Self {
        Self {
            cumulatives: stats,
            ..Self::default()
        }
    }

    /// Carry `prior`'s running total into this period's numbers
    pub(crate) fn after(prior: &Running, numbers: &[f64]) -> Self {
        let mut carried = Vec::with_capacity(numbers.len() + 1);
        carried.push(prior.cumulatives.total);
        carried.extend_from_slice(numbers);
        let cumulatives = summarize(&carried).unwrap_or(Stats::EMPTY);
        Self {
            cumulatives,
            cumulative_deltas: delta(&cumulatives, &prior.cumulatives),
            cumulative_percents: percent_change(&cumulatives, &prior.cumulatives),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub(crate) key: String,
    pub(crate) granularity: Granularity,
    pub(crate) children: Arc<PeriodChildren>,
    pub(crate) totals: Option<Totals>,
    pub(crate) comparison: Option<Comparison>,
    pub(crate) running: Option<Running>,
    /// Outer `None` means not computed yet
    pub(crate) extremes: Option<Option<Extremes>>,
    snapshot: Option<Arc<PeriodData>>,
}

impl CacheEntry {
    pub(crate) fn new(key: &str, granularity: Granularity) -> Result<Self, CacheError> {
        let children = match granularity {
            Granularity::Day => {
                crate::core::validate_key(key, granularity)?;
                PeriodChildren::default()
            }
            _ => PeriodChildren {
                days: child_days(key, granularity)?,
                weeks: child_weeks(key, granularity)?,
                months: child_months(key, granularity)?,
            },
        };
        Ok(Self {
            key: key.to_string(),
            granularity,
            children: Arc::new(children),
            totals: None,
            comparison: None,
            running: None,
            extremes: None,
            snapshot: None,
        })
    }

    /// Drop every derived value; structural fields stay
    pub(crate) fn invalidate_all(&mut self) {
        self.totals = None;
        self.extremes = None;
        self.invalidate_aggregates();
    }

    /// Drop values that depend on earlier periods
    pub(crate) fn invalidate_aggregates(&mut self) {
        self.comparison = None;
        self.running = None;
        self.snapshot = None;
    }

    pub(crate) fn snapshot(&self) -> Option<&Arc<PeriodData>> {
        self.snapshot.as_ref()
    }

    /// Assemble the public view once every stage is filled
    pub(crate) fn complete(&mut self) -> Option<Arc<PeriodData>> {
        if let Some(snapshot) = &self.snapshot {
            return Some(Arc::clone(snapshot));
        }
        let totals = self.totals.as_ref()?;
        let comparison = self.comparison?;
        let running = self.running?;
        let extremes = self.extremes?;

        let data = Arc::new(PeriodData {
            id: PeriodId::Keyed {
                granularity: self.granularity,
                key: self.key.clone(),
            },
            children: Arc::clone(&self.children),
            numbers: Arc::clone(&totals.numbers),
            stats: totals.stats,
            deltas: comparison.deltas,
            percents: comparison.percents,
            cumulatives: running.cumulatives,
            cumulative_deltas: running.cumulative_deltas,
            cumulative_percents: running.cumulative_percents,
            extremes,
        });
        self.snapshot = Some(Arc::clone(&data));
        Some(data)
    }
}
