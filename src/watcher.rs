//! Watcher facade: load a collection, run a detector, answer queries

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::detector::{Detector, RegressionRow};
use crate::ingest;
use crate::series::SampleRow;

/// Holds the annotated table for one analysis run and answers queries
/// over it. The table is immutable once built; a new run rebuilds it
/// from scratch.
#[derive(Debug)]
pub struct Watcher {
    data: Vec<RegressionRow>,
}

impl Watcher {
    /// Load an ASV collection from disk and run `detector` over it
    pub fn from_collection(detector: &dyn Detector, collection: &Path) -> Result<Self> {
        let rows = ingest::load_collection(collection)
            .with_context(|| format!("failed to load collection {}", collection.display()))?;
        info!(rows = rows.len(), "loaded benchmark collection");
        Self::from_rows(detector, rows)
    }

    /// Run `detector` over an already-materialized sample table
    pub fn from_rows(detector: &dyn Detector, rows: Vec<SampleRow>) -> Result<Self> {
        let data = detector
            .detect_regressions(rows)
            .context("regression detection failed")?;
        let flagged = data.iter().filter(|r| r.is_regression).count();
        info!(rows = data.len(), flagged, "regression detection complete");
        Ok(Self { data })
    }

    /// Full annotated table, sorted by (name, params, revision)
    pub fn summary(&self) -> &[RegressionRow] {
        &self.data
    }

    /// Rows flagged as regression onsets
    pub fn regressions(&self) -> impl Iterator<Item = &RegressionRow> {
        self.data.iter().filter(|r| r.is_regression)
    }

    /// Series flagged at the commit with `hash`
    pub fn regressions_for_hash(&self, hash: &str) -> Vec<&RegressionRow> {
        self.regressions()
            .filter(|r| r.commit_hash == hash)
            .collect()
    }

    /// The (good, bad) commit pair bracketing the regression flagged at
    /// `hash`: the offending commit and the last *measured* run before
    /// it within the same series. Benchmark runs can skip commits, so
    /// the pair spans every candidate commit between the two runs —
    /// skipped (unmeasured) rows must not narrow the range.
    pub fn commit_range(&self, hash: &str) -> Option<(String, String)> {
        let mut prev: Option<&RegressionRow> = None;
        for row in &self.data {
            let same_series = prev.is_some_and(|p| p.name == row.name && p.params == row.params);
            if !same_series {
                prev = None;
            }
            if row.is_regression && row.commit_hash == hash {
                let good = prev.map(|p| p.commit_hash.clone()).unwrap_or_default();
                return Some((good, row.commit_hash.clone()));
            }
            if row.time.is_some() {
                prev = Some(row);
            }
        }
        None
    }
}
