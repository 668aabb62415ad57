use anyhow::{Context, Result};
use asv_watcher::{
    cli::{Cli, OutputFormat},
    detector::{DetectorConfig, EdgePolicy, RegressionRow, RollingDetector},
    json_output::JsonReport,
    summary::{render_table, summarize_regressions},
    util::{pct_to_str, time_to_str},
    watcher::Watcher,
};
use clap::Parser;
use regex::Regex;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_hash_report(watcher: &Watcher, hash: &str, rows: &[&RegressionRow]) {
    if rows.is_empty() {
        println!("No regressions flagged at {hash}");
        return;
    }

    if let Some((good, bad)) = watcher.commit_range(hash) {
        println!("Regression window: {good}...{bad}");
    }
    println!();
    for row in rows {
        let pct = row.pct_change.map(pct_to_str).unwrap_or_else(|| "-".into());
        let abs = row.abs_change.map(time_to_str).unwrap_or_else(|| "-".into());
        if row.params.is_empty() {
            println!("  {} (revision {}): {} / {}", row.name, row.revision, pct, abs);
        } else {
            println!(
                "  {} [{}] (revision {}): {} / {}",
                row.name, row.params, row.revision, pct, abs
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = DetectorConfig {
        window_size: cli.window_size,
        tolerance: cli.tolerance,
        edge_policy: if cli.strict_edges {
            EdgePolicy::Strict
        } else {
            EdgePolicy::Shrink
        },
    };
    let detector = RollingDetector::new(config)?;

    let filter = cli
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid --expr regular expression")?;

    let watcher = Watcher::from_collection(&detector, &cli.collection)?;

    let matches_filter =
        |row: &&RegressionRow| filter.as_ref().map_or(true, |re| re.is_match(&row.name));

    if let Some(hash) = &cli.hash {
        let rows: Vec<&RegressionRow> = watcher
            .regressions_for_hash(hash)
            .into_iter()
            .filter(|r| matches_filter(r))
            .collect();
        match cli.format {
            OutputFormat::Text => print_hash_report(&watcher, hash, &rows),
            OutputFormat::Json => {
                let rows_owned: Vec<RegressionRow> = rows.iter().map(|r| (*r).clone()).collect();
                let summaries = summarize_regressions(&rows_owned);
                let report = JsonReport::new(detector.config(), &summaries, rows);
                println!("{}", report.to_json_string()?);
            }
        }
        return Ok(());
    }

    let flagged: Vec<&RegressionRow> = watcher.regressions().filter(matches_filter).collect();
    let flagged_owned: Vec<RegressionRow> = flagged.iter().map(|r| (*r).clone()).collect();
    let summaries = summarize_regressions(&flagged_owned);

    match cli.format {
        OutputFormat::Text => {
            if summaries.is_empty() {
                println!("No regressions detected");
            } else {
                print!("{}", render_table(&summaries));
            }
        }
        OutputFormat::Json => {
            let report = JsonReport::new(detector.config(), &summaries, flagged);
            println!("{}", report.to_json_string()?);
        }
    }

    Ok(())
}
