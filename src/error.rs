//! Error types for the watcher core
//!
//! The core fails only on contract violations. Data sparsity (empty
//! series, all-null timings, single samples) is valid input and never
//! produces an error.

use thiserror::Error;

/// Errors raised by the detection core
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Detector configuration violates its contract
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An input row cannot form a well-defined grouping key
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

pub type Result<T> = std::result::Result<T, WatcherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WatcherError::InvalidConfiguration("window_size must be positive".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: window_size must be positive"
        );

        let err = WatcherError::MalformedInput("empty benchmark name".into());
        assert_eq!(err.to_string(), "malformed input: empty benchmark name");
    }
}
