//! Summary statistics over flat number lists
//!
//! Pure functions: summarizing, comparing two summaries, and per-metric
//! extremes across a set of summaries.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Summary of a list of numbers
///
/// `count` is kept as `f64` so the same shape can carry signed deltas.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub count: f64,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value (smallest wins on ties)
    pub mode: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Population variance
    pub variance: f64,
    pub stdev: f64,
}

impl Stats {
    /// Canonical summary of an empty list
    pub const EMPTY: Stats = Stats {
        count: 0.0,
        total: 0.0,
        mean: 0.0,
        median: 0.0,
        mode: 0.0,
        min: 0.0,
        max: 0.0,
        range: 0.0,
        variance: 0.0,
        stdev: 0.0,
    };

    pub fn is_populated(&self) -> bool {
        self.count > 0.0
    }

    /// Apply `f` to every metric pair of `self` and `other`
    fn zip_with(&self, other: &Stats, f: impl Fn(f64, f64) -> f64) -> Stats {
        Stats {
            count: f(self.count, other.count),
            total: f(self.total, other.total),
            mean: f(self.mean, other.mean),
            median: f(self.median, other.median),
            mode: f(self.mode, other.mode),
            min: f(self.min, other.min),
            max: f(self.max, other.max),
            range: f(self.range, other.range),
            variance: f(self.variance, other.variance),
            stdev: f(self.stdev, other.stdev),
        }
    }
}

/// Percent changes per metric; `None` where the baseline metric is zero
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialStats {
    pub count: Option<f64>,
    pub total: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub range: Option<f64>,
    pub variance: Option<f64>,
    pub stdev: Option<f64>,
}

/// Per-metric minimum and maximum across several summaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    pub min: Stats,
    pub max: Stats,
}

fn total_cmp(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Summarize `numbers`, or `None` if the list is empty
pub fn summarize(numbers: &[f64]) -> Option<Stats> {
    if numbers.is_empty() {
        return None;
    }

    let mut sorted = numbers.to_vec();
    sorted.sort_by(total_cmp);

    let count = sorted.len() as f64;
    let total: f64 = sorted.iter().sum();
    let mean = total / count;
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let variance = sorted.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / count;

    Some(Stats {
        count,
        total,
        mean,
        median,
        mode: mode_of_sorted(&sorted),
        min,
        max,
        range: max - min,
        variance,
        stdev: variance.sqrt(),
    })
}

/// Longest run in an ascending list; the first (smallest) run wins ties
fn mode_of_sorted(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_len = 0;
    let mut run_start = 0;

    for i in 1..=sorted.len() {
        if i == sorted.len() || sorted[i] != sorted[run_start] {
            let len = i - run_start;
            if len > best_len {
                best = sorted[run_start];
                best_len = len;
            }
            run_start = i;
        }
    }
    best
}

/// Metric-wise `current - baseline`
pub fn delta(current: &Stats, baseline: &Stats) -> Stats {
    current.zip_with(baseline, |c, b| c - b)
}

/// Metric-wise percent change from `baseline` to `current`
pub fn percent_change(current: &Stats, baseline: &Stats) -> PartialStats {
    let pct = |c: f64, b: f64| (b != 0.0).then(|| (c - b) / b * 100.0);
    PartialStats {
        count: pct(current.count, baseline.count),
        total: pct(current.total, baseline.total),
        mean: pct(current.mean, baseline.mean),
        median: pct(current.median, baseline.median),
        mode: pct(current.mode, baseline.mode),
        min: pct(current.min, baseline.min),
        max: pct(current.max, baseline.max),
        range: pct(current.range, baseline.range),
        variance: pct(current.variance, baseline.variance),
        stdev: pct(current.stdev, baseline.stdev),
    }
}

/// Per-metric min/max across `stats`; `None` with fewer than two inputs
pub fn calculate_extremes(stats: &[Stats]) -> Option<Extremes> {
    let (first, rest) = stats.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let extremes = rest.iter().fold(
        Extremes {
            min: *first,
            max: *first,
        },
        |acc, s| Extremes {
            min: acc.min.zip_with(s, f64::min),
            max: acc.max.zip_with(s, f64::max),
        },
    );
    Some(extremes)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn summarize_single_value() {
        let s = summarize(&[10.0]).unwrap();
        assert_eq!(s.count, 1.0);
        assert_eq!(s.total, 10.0);
        assert_eq!(s.mean, 10.0);
        assert_eq!(s.median, 10.0);
        assert_eq!(s.mode, 10.0);
        assert_eq!(s.range, 0.0);
        assert_eq!(s.variance, 0.0);
    }

    #[test]
    fn summarize_odd_length() {
        let s = summarize(&[30.0, 10.0, 20.0]).unwrap();
        assert_eq!(s.count, 3.0);
        assert_eq!(s.total, 60.0);
        assert_eq!(s.mean, 20.0);
        assert_eq!(s.median, 20.0);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 30.0);
        assert_eq!(s.range, 20.0);
    }

    #[test]
    fn summarize_even_length_median_averages_middle() {
        let s = summarize(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.median, 2.5);
    }

    #[test]
    fn summarize_population_variance() {
        // mean 5, squared deviations 9+1+1+1+0+0+4+16 = 32, / 8 = 4
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.variance, 4.0);
        assert_eq!(s.stdev, 2.0);
    }

    #[test]
    fn mode_prefers_most_frequent() {
        let s = summarize(&[1.0, 3.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.mode, 3.0);
    }

    #[test]
    fn mode_tie_takes_smallest() {
        let s = summarize(&[5.0, 2.0, 5.0, 2.0, 9.0]).unwrap();
        assert_eq!(s.mode, 2.0);
    }

    #[test]
    fn delta_subtracts_each_metric() {
        let cur = summarize(&[10.0, 20.0, 30.0]).unwrap();
        let base = summarize(&[10.0]).unwrap();
        let d = delta(&cur, &base);
        assert_eq!(d.total, 50.0);
        assert_eq!(d.count, 2.0);
        assert_eq!(d.mean, 10.0);
    }

    #[test]
    fn delta_against_empty_is_identity() {
        let cur = summarize(&[3.0, 4.0]).unwrap();
        assert_eq!(delta(&cur, &Stats::EMPTY), cur);
    }

    #[test]
    fn percent_change_basic() {
        let cur = summarize(&[30.0]).unwrap();
        let base = summarize(&[10.0]).unwrap();
        let p = percent_change(&cur, &base);
        assert_eq!(p.total, Some(200.0));
        assert_eq!(p.count, Some(0.0));
    }

    #[test]
    fn percent_change_zero_baseline_is_absent() {
        let cur = summarize(&[5.0]).unwrap();
        let p = percent_change(&cur, &Stats::EMPTY);
        assert_eq!(p, PartialStats::default());
    }

    #[test]
    fn percent_change_negative() {
        let cur = summarize(&[5.0]).unwrap();
        let base = summarize(&[20.0]).unwrap();
        assert_eq!(percent_change(&cur, &base).total, Some(-75.0));
    }

    #[test]
    fn extremes_require_two_inputs() {
        assert!(calculate_extremes(&[]).is_none());
        let one = summarize(&[1.0]).unwrap();
        assert!(calculate_extremes(&[one]).is_none());
    }

    #[test]
    fn extremes_per_metric() {
        let a = summarize(&[1.0, 9.0]).unwrap();
        let b = summarize(&[4.0]).unwrap();
        let c = summarize(&[2.0, 2.0, 2.0]).unwrap();
        let e = calculate_extremes(&[a, b, c]).unwrap();
        assert_eq!(e.min.total, 4.0);
        assert_eq!(e.max.total, 10.0);
        assert_eq!(e.min.count, 1.0);
        assert_eq!(e.max.count, 3.0);
        assert_eq!(e.min.min, 1.0);
        assert_eq!(e.max.max, 9.0);
        assert_eq!(e.max.range, 8.0);
    }
}
