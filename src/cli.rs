//! CLI argument parsing for asv-watcher

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output format for the regression report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text table (default)
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "asv-watcher")]
#[command(version)]
#[command(about = "Flags commits that introduce sustained benchmark regressions", long_about = None)]
pub struct Cli {
    /// Path to a checked-out ASV results collection (the directory
    /// containing index.json and graphs/)
    pub collection: PathBuf,

    /// Rolling window width, in samples
    #[arg(
        short = 'w',
        long = "window-size",
        value_name = "SIZE",
        default_value = "30"
    )]
    pub window_size: usize,

    /// Tolerance ratio in (0, 1); smaller demands a bigger slowdown
    #[arg(long = "tolerance", value_name = "RATIO", default_value = "0.95")]
    pub tolerance: f64,

    /// Require full windows near series edges instead of shrinking them
    #[arg(long = "strict-edges")]
    pub strict_edges: bool,

    /// Only report benchmarks whose name matches this regular expression
    #[arg(short = 'e', long = "expr", value_name = "REGEX")]
    pub filter: Option<String>,

    /// Show the regressions flagged at one commit hash
    #[arg(long = "hash", value_name = "HASH")]
    pub hash: Option<String>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
