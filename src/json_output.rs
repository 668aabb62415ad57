//! JSON output format for machine consumption

use serde::Serialize;

use crate::detector::{DetectorConfig, RegressionRow};
use crate::summary::RegressionSummary;

/// Top-level payload for `--format json`: the configuration the run
/// used, the per-commit rollup, and every flagged row
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub config: &'a DetectorConfig,
    pub summary: &'a [RegressionSummary],
    pub regressions: Vec<&'a RegressionRow>,
}

impl<'a> JsonReport<'a> {
    pub fn new(
        config: &'a DetectorConfig,
        summary: &'a [RegressionSummary],
        regressions: Vec<&'a RegressionRow>,
    ) -> Self {
        Self {
            config,
            summary,
            regressions,
        }
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
