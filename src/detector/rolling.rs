//! Rolling-envelope regression detector
//!
//! Windowed extrema use a monotonic-deque sliding window, O(n) per
//! series instead of the O(n·k) naive scan. The deque holds candidate
//! indices whose values are monotone, so the current extremum is always
//! at the front; each index is pushed and popped at most once.

use std::collections::VecDeque;

use tracing::debug;

use crate::detector::config::{DetectorConfig, EdgePolicy};
use crate::detector::{Detector, RegressionRow};
use crate::error::Result;
use crate::series::{group_series, Sample, SampleRow, SeriesKey};

/// Detects sustained slowdowns by comparing monotone reductions of
/// rolling best/worst envelopes against a tolerance ratio.
#[derive(Debug, Clone)]
pub struct RollingDetector {
    config: DetectorConfig,
}

impl RollingDetector {
    /// Build a detector, rejecting invalid configuration up front
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Detector with default tolerance and edge policy
    pub fn with_window_size(window_size: usize) -> Result<Self> {
        Self::new(DetectorConfig::with_window_size(window_size))
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    fn annotate_series(&self, key: &SeriesKey, samples: &[Sample], out: &mut Vec<RegressionRow>) {
        let n = samples.len();

        // Rolling/flag computation runs over the measured subsequence;
        // null-time rows keep their place in the output with null
        // derived columns.
        let valid: Vec<usize> = (0..n).filter(|&i| samples[i].time.is_some()).collect();
        let times: Vec<f64> = valid
            .iter()
            .map(|&i| samples[i].time.unwrap_or_default())
            .collect();

        let (worst, best) = rolling_envelopes(&times, &self.config);
        let worst_cummin = cummin_forward(&worst);
        let best_cummin_rev = cummin_backward(&best);
        let flags = classify(
            &worst_cummin,
            &best_cummin_rev,
            self.config.tolerance,
            self.config.lag(),
        );

        let onsets = flags.iter().filter(|&&f| f).count();
        if onsets > 0 {
            debug!(
                benchmark = %key.name,
                params = %key.params,
                onsets,
                "regression onsets flagged"
            );
        }

        let (pct_change, abs_change) = change_metrics(samples);

        let mut established_worst = vec![None; n];
        let mut established_best = vec![None; n];
        let mut established_worst_cummin = vec![None; n];
        let mut established_best_cummin_rev = vec![None; n];
        let mut is_regression = vec![false; n];
        for (k, &i) in valid.iter().enumerate() {
            established_worst[i] = worst[k];
            established_best[i] = best[k];
            established_worst_cummin[i] = worst_cummin[k];
            established_best_cummin_rev[i] = best_cummin_rev[k];
            is_regression[i] = flags[k];
        }

        for (i, sample) in samples.iter().enumerate() {
            out.push(RegressionRow {
                name: key.name.clone(),
                params: key.params.clone(),
                revision: sample.revision,
                time: sample.time,
                commit_hash: sample.commit_hash.clone(),
                date: sample.date,
                established_worst: established_worst[i],
                established_best: established_best[i],
                established_worst_cummin: established_worst_cummin[i],
                established_best_cummin_rev: established_best_cummin_rev[i],
                is_regression: is_regression[i],
                pct_change: pct_change[i],
                abs_change: abs_change[i],
            });
        }
    }
}

impl Detector for RollingDetector {
    fn detect_regressions(&self, rows: Vec<SampleRow>) -> Result<Vec<RegressionRow>> {
        let series = group_series(rows)?;
        let mut out = Vec::new();
        for (key, samples) in &series {
            self.annotate_series(key, samples, &mut out);
        }
        Ok(out)
    }
}

/// Windowed max and min of `times` over the centered window
/// `[i - (w-1)/2, i + w/2]`, clipped to the series bounds.
///
/// Under [`EdgePolicy::Strict`], clipped positions yield `None` instead
/// of a shrunken-window value.
fn rolling_envelopes(
    times: &[f64],
    config: &DetectorConfig,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let n = times.len();
    let mut worst = vec![None; n];
    let mut best = vec![None; n];
    if n == 0 {
        return (worst, best);
    }

    let lead = config.lead();
    let lag = config.lag();

    // Indices in the current window whose values are monotone
    // decreasing (max) / increasing (min); front is the extremum.
    let mut max_idx: VecDeque<usize> = VecDeque::new();
    let mut min_idx: VecDeque<usize> = VecDeque::new();
    let mut next = 0usize;

    for i in 0..n {
        let lo = i.saturating_sub(lag);
        let hi = (i + lead).min(n - 1);

        while next <= hi {
            while max_idx.back().is_some_and(|&j| times[j] <= times[next]) {
                max_idx.pop_back();
            }
            max_idx.push_back(next);
            while min_idx.back().is_some_and(|&j| times[j] >= times[next]) {
                min_idx.pop_back();
            }
            min_idx.push_back(next);
            next += 1;
        }

        while max_idx.front().is_some_and(|&j| j < lo) {
            max_idx.pop_front();
        }
        while min_idx.front().is_some_and(|&j| j < lo) {
            min_idx.pop_front();
        }

        if config.edge_policy == EdgePolicy::Strict && hi - lo + 1 < config.window_size {
            continue;
        }

        worst[i] = max_idx.front().map(|&j| times[j]);
        best[i] = min_idx.front().map(|&j| times[j]);
    }

    (worst, best)
}

/// Forward running minimum. Null entries stay null without interrupting
/// the running bound.
fn cummin_forward(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut low: Option<f64> = None;
    values
        .iter()
        .map(|v| match v {
            Some(x) => {
                let m = low.map_or(*x, |l| l.min(*x));
                low = Some(m);
                Some(m)
            }
            None => None,
        })
        .collect()
}

/// Backward running minimum, same null handling as [`cummin_forward`]
fn cummin_backward(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let mut low: Option<f64> = None;
    for i in (0..values.len()).rev() {
        if let Some(x) = values[i] {
            let m = low.map_or(x, |l| l.min(x));
            low = Some(m);
            out[i] = Some(m);
        }
    }
    out
}

/// Tolerance comparison, rising-edge deduplication, and the half-window
/// re-centering shift.
///
/// The raw flag holds wherever the settled worst bound sits below
/// `tolerance` times the eventual best bound. A contiguous raw run
/// collapses to its first index, and the result shifts back by
/// `(w-1)/2` positions: the centered window that first sees a slowdown
/// lags the true onset by half its width.
fn classify(
    worst_cummin: &[Option<f64>],
    best_cummin_rev: &[Option<f64>],
    tolerance: f64,
    lag: usize,
) -> Vec<bool> {
    let n = worst_cummin.len();
    let raw: Vec<bool> = (0..n)
        .map(|i| {
            matches!(
                (worst_cummin[i], best_cummin_rev[i]),
                (Some(worst), Some(best)) if worst < tolerance * best
            )
        })
        .collect();

    let edge: Vec<bool> = (0..n).map(|i| raw[i] && !(i > 0 && raw[i - 1])).collect();

    (0..n)
        .map(|i| edge.get(i + lag).copied().unwrap_or(false))
        .collect()
}

/// Per-sample change against the immediate predecessor in revision
/// order. Null at the series head and wherever either endpoint of the
/// pair has no measurement.
fn change_metrics(samples: &[Sample]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let n = samples.len();
    let mut pct = vec![None; n];
    let mut abs = vec![None; n];
    for i in 1..n {
        if let (Some(cur), Some(prev)) = (samples[i].time, samples[i - 1].time) {
            pct[i] = Some(cur / prev - 1.0);
            abs[i] = Some(cur - prev);
        }
    }
    (pct, abs)
}
