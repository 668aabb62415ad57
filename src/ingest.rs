//! Loading an on-disk ASV results collection into the long-format table
//!
//! Collection layout: `index.json` at the root describes every benchmark
//! (parameter grid) and maps revisions to commit hashes and dates;
//! per-benchmark series files live under `graphs/<environment>/`, one
//! JSON array of `[revision, value]` entries each. Fetching the
//! collection (git clone or otherwise) is the caller's problem; this
//! module only reads files.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::params::ParameterCollection;
use crate::series::{Sample, SampleRow, SeriesKey};

/// Parsed `index.json`
#[derive(Debug, Deserialize)]
pub struct IndexData {
    pub benchmarks: BTreeMap<String, BenchmarkSpec>,
    #[serde(default)]
    pub revision_to_hash: BTreeMap<String, String>,
    /// Epoch milliseconds per revision
    #[serde(default)]
    pub revision_to_date: BTreeMap<String, i64>,
}

/// Benchmark entry in the index: parameter names and their value lists
#[derive(Debug, Deserialize)]
pub struct BenchmarkSpec {
    #[serde(default)]
    pub param_names: Vec<String>,
    #[serde(default)]
    pub params: Vec<Vec<String>>,
}

/// Timing payload of one `[revision, value]` graph entry.
///
/// A parameterless benchmark stores a bare float (or null when the run
/// was skipped); a parameterized one stores an array with one
/// float-or-null slot per parameter combination.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimes {
    Scalar(Option<f64>),
    PerCombo(Vec<Option<f64>>),
}

type RawEntry = (i64, RawTimes);

/// Read and parse `index.json`
pub fn read_index(path: &Path) -> Result<IndexData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read index {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Directories under `graphs/` holding per-benchmark series files.
/// Summary graphs are aggregate views, not series, and are skipped.
pub fn benchmark_prefixes(collection: &Path) -> Result<Vec<PathBuf>> {
    let graphs = collection.join("graphs");
    let mut prefixes = BTreeSet::new();
    if graphs.is_dir() {
        collect_graph_dirs(&graphs, &mut prefixes)?;
    } else {
        warn!(path = %graphs.display(), "collection has no graphs directory");
    }
    Ok(prefixes.into_iter().collect())
}

fn collect_graph_dirs(dir: &Path, out: &mut BTreeSet<PathBuf>) -> Result<()> {
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            collect_graph_dirs(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json")
            && !path.to_string_lossy().contains("summary")
        {
            if let Some(parent) = path.parent() {
                out.insert(parent.to_path_buf());
            }
        }
    }
    Ok(())
}

/// Load a whole collection into long-format rows, one per
/// (series, revision), with duplicate runs mean-aggregated.
pub fn load_collection(collection: &Path) -> Result<Vec<SampleRow>> {
    let index = read_index(&collection.join("index.json"))?;
    let prefixes = benchmark_prefixes(collection)?;

    let mut rows = Vec::new();
    for (name, spec) in &index.benchmarks {
        let grid = ParameterCollection::new(&spec.param_names, &spec.params);
        let entries = read_benchmark_entries(name, &prefixes);
        if entries.is_empty() {
            debug!(benchmark = %name, "no graph data; skipping");
            continue;
        }

        for (revision, times) in entries {
            let times = match times {
                // A null payload means the whole run is absent, not a
                // null sample per combination.
                RawTimes::Scalar(None) => continue,
                RawTimes::Scalar(time) => vec![time],
                RawTimes::PerCombo(times) => times,
            };
            if times.len() != grid.len() {
                warn!(
                    benchmark = %name,
                    expected = grid.len(),
                    got = times.len(),
                    "timing array does not match parameter grid"
                );
            }
            for (combo, time) in grid.combos().iter().zip(times) {
                let rev_key = revision.to_string();
                rows.push(SampleRow::new(
                    SeriesKey::new(name.clone(), combo.param_string()),
                    Sample {
                        revision,
                        time,
                        commit_hash: index
                            .revision_to_hash
                            .get(&rev_key)
                            .cloned()
                            .unwrap_or_default(),
                        date: index
                            .revision_to_date
                            .get(&rev_key)
                            .and_then(|&millis| DateTime::<Utc>::from_timestamp_millis(millis)),
                    },
                ));
            }
        }
    }

    Ok(aggregate_duplicates(rows))
}

/// Concatenate one benchmark's graph entries across environments.
/// Missing files are normal (not every environment runs every
/// benchmark); unparseable files are logged and skipped.
fn read_benchmark_entries(name: &str, prefixes: &[PathBuf]) -> Vec<RawEntry> {
    let mut entries = Vec::new();
    for prefix in prefixes {
        let path = prefix.join(format!("{name}.json"));
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => continue,
        };
        match serde_json::from_str::<Vec<RawEntry>>(&raw) {
            Ok(parsed) => entries.extend(parsed),
            Err(err) => warn!(path = %path.display(), %err, "failed to parse graph file"),
        }
    }
    entries
}

/// Collapse repeat runs of the same (series, revision) — e.g. results
/// against differing dependency sets — to their arithmetic mean, nulls
/// excluded. Hash and date come from the first run.
fn aggregate_duplicates(rows: Vec<SampleRow>) -> Vec<SampleRow> {
    let mut grouped: BTreeMap<(SeriesKey, i64), Vec<Sample>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry((row.key.clone(), row.sample.revision))
            .or_default()
            .push(row.sample);
    }

    grouped
        .into_iter()
        .map(|((key, revision), samples)| {
            let times: Vec<f64> = samples.iter().filter_map(|s| s.time).collect();
            let time = if times.is_empty() {
                None
            } else {
                Some(times.iter().sum::<f64>() / times.len() as f64)
            };
            let first = &samples[0];
            SampleRow::new(
                key,
                Sample {
                    revision,
                    time,
                    commit_hash: first.commit_hash.clone(),
                    date: first.date,
                },
            )
        })
        .collect()
}
