//! Invalidation after a single-day write
//!
//! The containing period at each granularity loses everything. Every cached
//! period sorting after it keeps its own numbers but loses the values chained
//! from earlier periods. Earlier periods are never touched.

use chrono::NaiveDate;
use std::ops::Bound::{Excluded, Unbounded};
use tracing::trace;

use crate::cache::engine::PeriodCache;
use crate::core::{Granularity, period_of};

impl PeriodCache {
    pub(super) fn invalidate_day(&mut self, day: NaiveDate) {
        for granularity in Granularity::ALL {
            let key = period_of(day, granularity);
            let map = &mut self.caches[granularity.index()];

            if let Some(entry) = map.get_mut(&key) {
                entry.invalidate_all();
            }

            let mut later = 0usize;
            for (_, entry) in map.range_mut::<str, _>((Excluded(key.as_str()), Unbounded)) {
                entry.invalidate_aggregates();
                later += 1;
            }
            trace!(%granularity, key = %key, later, "invalidated");
        }

        self.alltime = None;
    }
}
