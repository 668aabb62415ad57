//! Regression detection over per-series benchmark timings
//!
//! The detector consumes the long-format sample table and hands back the
//! same rows annotated with derived columns. The rolling implementation
//! works in five stages per series:
//!
//! 1. Windowed max/min envelopes over a centered window ("established
//!    worst" / "established best"), nulls excluded
//! 2. Monotone reduction: forward running min of the worst envelope,
//!    backward running min of the best envelope
//! 3. Tolerance comparison of the two bounds into a raw flag
//! 4. Rising-edge deduplication, then a half-window shift so the flag
//!    lands on the first anomalous sample rather than the window center
//! 5. Per-sample change metrics against the immediate predecessor
//!
//! Alternative strategies (e.g. change-point detection) plug in behind
//! the [`Detector`] trait; callers depend only on the trait.

mod config;
mod rolling;

pub use config::{DetectorConfig, EdgePolicy, DEFAULT_TOLERANCE, DEFAULT_WINDOW_SIZE};
pub use rolling::RollingDetector;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::series::SampleRow;

/// One row of the annotated output table: the input sample plus every
/// derived column. Derived columns are null for rows excluded from the
/// rolling computation (null `time`, or clipped under
/// [`EdgePolicy::Strict`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionRow {
    pub name: String,
    pub params: String,
    pub revision: i64,
    pub time: Option<f64>,
    pub commit_hash: String,
    pub date: Option<DateTime<Utc>>,

    /// Windowed max of `time` over the centered window
    pub established_worst: Option<f64>,
    /// Windowed min of `time` over the centered window
    pub established_best: Option<f64>,
    /// Forward running min of `established_worst`
    pub established_worst_cummin: Option<f64>,
    /// Backward running min of `established_best`
    pub established_best_cummin_rev: Option<f64>,
    /// True at regression onsets, after deduplication and re-centering
    pub is_regression: bool,
    /// `time[i] / time[i-1] - 1` against the immediate predecessor
    pub pct_change: Option<f64>,
    /// `time[i] - time[i-1]` against the immediate predecessor
    pub abs_change: Option<f64>,
}

/// A regression-detection strategy over the long-format sample table
///
/// Implementations must treat series independently, preserve revision
/// order within each series, and fail only on contract violations —
/// sparse data (empty series, all-null timings) yields valid all-false
/// output.
pub trait Detector {
    /// Annotate `rows` with derived columns, sorted by
    /// `(name, params, revision)`.
    fn detect_regressions(&self, rows: Vec<SampleRow>) -> Result<Vec<RegressionRow>>;
}
