//! Configuration for the rolling regression detector

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatcherError};

/// Tolerance ratio applied to the monotone bounds: the established worst
/// must drop below `tolerance` times the eventual established best, i.e.
/// the series must end up at least 5% slower, before a sample counts as
/// a regression onset.
pub const DEFAULT_TOLERANCE: f64 = 0.95;

/// Rolling window width used when none is configured. Matches the
/// window the nightly update job runs with.
pub const DEFAULT_WINDOW_SIZE: usize = 30;

/// How rolling windows behave where they overhang the ends of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Windows clipped to the series bounds still produce a value; a
    /// single in-bounds sample is enough (default)
    Shrink,
    /// Positions with fewer than `window_size` in-bounds samples get a
    /// null envelope instead
    Strict,
}

/// Configuration for rolling-window regression detection
///
/// # Example
/// ```
/// use asv_watcher::detector::DetectorConfig;
///
/// let config = DetectorConfig::default();
/// assert_eq!(config.window_size, 30);
/// assert_eq!(config.tolerance, 0.95);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Width of the centered rolling window, in samples
    ///
    /// The window at sample `i` covers `[i - (w-1)/2, i + w/2]` within
    /// the series. A larger window demands a longer sustained slowdown
    /// before flagging, trading detection latency for fewer false
    /// positives from noisy samples.
    pub window_size: usize,

    /// Tolerance ratio in (0, 1); see [`DEFAULT_TOLERANCE`]
    pub tolerance: f64,

    /// Edge handling where windows overhang the series bounds
    pub edge_policy: EdgePolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            tolerance: DEFAULT_TOLERANCE,
            edge_policy: EdgePolicy::Shrink,
        }
    }
}

impl DetectorConfig {
    /// Default configuration with a specific window width
    pub fn with_window_size(window_size: usize) -> Self {
        Self {
            window_size,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(WatcherError::InvalidConfiguration(
                "window_size must be positive".into(),
            ));
        }

        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(WatcherError::InvalidConfiguration(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }

        Ok(())
    }

    /// Samples the centered window reaches ahead of its center
    pub(crate) fn lead(&self) -> usize {
        self.window_size / 2
    }

    /// Samples the centered window reaches behind its center; also the
    /// re-centering shift applied to the final flag column
    pub(crate) fn lag(&self) -> usize {
        (self.window_size - 1) / 2
    }
}
