//! Long-format benchmark sample table and per-series grouping
//!
//! Every measurement lives in one row tagged with its series identity:
//! benchmark name plus resolved parameter signature. All per-series
//! operations group on that pair; series never interact.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WatcherError};

/// Identity of one benchmark time series: name plus the resolved
/// parameter signature (empty string for parameterless benchmarks).
///
/// Ordering is `(name, params)`, which fixes the cross-series output
/// order of the annotated table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub name: String,
    pub params: String,
}

impl SeriesKey {
    pub fn new(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
        }
    }
}

/// One measurement within a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Position in linear commit history; the per-series sort key
    pub revision: i64,
    /// Duration in seconds; `None` when the benchmark was skipped or
    /// errored at this revision
    pub time: Option<f64>,
    /// Carried through for reporting, never interpreted by the core
    pub commit_hash: String,
    /// Commit timestamp, when the collection index knows it
    pub date: Option<DateTime<Utc>>,
}

/// One row of the long-format input table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub key: SeriesKey,
    pub sample: Sample,
}

impl SampleRow {
    pub fn new(key: SeriesKey, sample: Sample) -> Self {
        Self { key, sample }
    }
}

/// Partition long-format rows into independent series, each sorted by
/// revision.
///
/// Raw results can arrive out of order (parallel ingestion), so revision
/// order is enforced here rather than assumed. Rows without a
/// well-defined grouping key are rejected, never silently dropped.
pub fn group_series(rows: Vec<SampleRow>) -> Result<BTreeMap<SeriesKey, Vec<Sample>>> {
    let mut series: BTreeMap<SeriesKey, Vec<Sample>> = BTreeMap::new();

    for row in rows {
        if row.key.name.is_empty() {
            return Err(WatcherError::MalformedInput(
                "sample row with empty benchmark name".into(),
            ));
        }
        series.entry(row.key).or_default().push(row.sample);
    }

    for samples in series.values_mut() {
        samples.sort_by_key(|s| s.revision);
    }

    Ok(series)
}
