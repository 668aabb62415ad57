//! Per-commit rollup of flagged regressions
//!
//! One regressing commit usually moves several benchmark series at
//! once; the rollup groups the flagged rows by commit hash so a reader
//! sees one line per suspect commit, most recent first.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detector::RegressionRow;
use crate::util::{pct_to_str, time_to_str};

/// Aggregate of every series flagged at one commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    pub commit_hash: String,
    pub date: Option<DateTime<Utc>>,
    /// Number of flagged series at this commit
    pub benchmarks: usize,
    pub pct_change_max: Option<f64>,
    pub pct_change_mean: Option<f64>,
    pub abs_change_max: Option<f64>,
    pub abs_change_mean: Option<f64>,
}

/// Group flagged rows by commit hash, sorted most recent first
/// (undated commits last)
pub fn summarize_regressions(rows: &[RegressionRow]) -> Vec<RegressionSummary> {
    let mut by_hash: BTreeMap<&str, Vec<&RegressionRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.is_regression) {
        by_hash.entry(&row.commit_hash).or_default().push(row);
    }

    let mut summaries: Vec<RegressionSummary> = by_hash
        .into_iter()
        .map(|(hash, flagged)| {
            let pct: Vec<f64> = flagged.iter().filter_map(|r| r.pct_change).collect();
            let abs: Vec<f64> = flagged.iter().filter_map(|r| r.abs_change).collect();
            RegressionSummary {
                commit_hash: hash.to_string(),
                date: flagged.iter().find_map(|r| r.date),
                benchmarks: flagged.len(),
                pct_change_max: max_of(&pct),
                pct_change_mean: mean_of(&pct),
                abs_change_max: max_of(&abs),
                abs_change_mean: mean_of(&abs),
            }
        })
        .collect();

    summaries.sort_by(|a, b| match (b.date, a.date) {
        (Some(db), Some(da)) => db.cmp(&da),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => a.commit_hash.cmp(&b.commit_hash),
    });
    summaries
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Fixed-width text table for the CLI
pub fn render_table(summaries: &[RegressionSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<42} {:<12} {:>10} {:>12} {:>12}\n",
        "commit", "date", "benchmarks", "worst pct", "worst abs"
    ));

    for summary in summaries {
        let date = summary
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let pct = summary
            .pct_change_max
            .map(pct_to_str)
            .unwrap_or_else(|| "-".to_string());
        let abs = summary
            .abs_change_max
            .map(time_to_str)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<42} {:<12} {:>10} {:>12} {:>12}\n",
            summary.commit_hash, date, summary.benchmarks, pct, abs
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn flagged_row(name: &str, hash: &str, pct: f64, abs: f64, millis: i64) -> RegressionRow {
        RegressionRow {
            name: name.to_string(),
            params: String::new(),
            revision: 22,
            time: Some(2.0),
            commit_hash: hash.to_string(),
            date: Utc.timestamp_millis_opt(millis).single(),
            established_worst: Some(2.0),
            established_best: Some(1.0),
            established_worst_cummin: Some(1.0),
            established_best_cummin_rev: Some(2.0),
            is_regression: true,
            pct_change: Some(pct),
            abs_change: Some(abs),
        }
    }

    #[test]
    fn test_rollup_groups_by_hash() {
        let rows = vec![
            flagged_row("a", "h1", 1.0, 1.0, 2_000),
            flagged_row("b", "h1", 0.5, 0.25, 2_000),
            flagged_row("c", "h2", 0.2, 0.1, 1_000),
        ];

        let summaries = summarize_regressions(&rows);
        assert_eq!(summaries.len(), 2);
        // Most recent first.
        assert_eq!(summaries[0].commit_hash, "h1");
        assert_eq!(summaries[0].benchmarks, 2);
        assert_eq!(summaries[0].pct_change_max, Some(1.0));
        assert_eq!(summaries[0].pct_change_mean, Some(0.75));
        assert_eq!(summaries[0].abs_change_max, Some(1.0));
        assert_eq!(summaries[1].commit_hash, "h2");
    }

    #[test]
    fn test_unflagged_rows_are_ignored() {
        let mut row = flagged_row("a", "h1", 1.0, 1.0, 0);
        row.is_regression = false;
        assert!(summarize_regressions(&[row]).is_empty());
    }

    #[test]
    fn test_render_table_contains_hashes() {
        let rows = vec![flagged_row("a", "deadbeef", 0.5, 0.001, 2_000)];
        let table = render_table(&summarize_regressions(&rows));
        assert!(table.contains("deadbeef"));
        assert!(table.contains("50.000%"));
        assert!(table.contains("1.000ms"));
    }
}
