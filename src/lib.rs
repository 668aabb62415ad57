//! asv-watcher - benchmark regression watcher for ASV result archives
//!
//! This library ingests historical benchmark time series (one series per
//! benchmark name and parameter combination, indexed by revision) and
//! flags the revisions where a sustained, statistically meaningful
//! slowdown begins, without manual inspection of the curves.

pub mod cli;
pub mod detector;
pub mod error;
pub mod ingest;
pub mod json_output;
pub mod params;
pub mod series;
pub mod summary;
pub mod util;
pub mod watcher;

pub use detector::{Detector, DetectorConfig, EdgePolicy, RegressionRow, RollingDetector};
pub use error::WatcherError;
pub use series::{Sample, SampleRow, SeriesKey};
pub use watcher::Watcher;
