//! Binary-level tests against the fixture collection

use std::path::{Path, PathBuf};

use predicates::prelude::*;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/asv_collection")
}

fn hash_22() -> String {
    format!("{:040x}", 22)
}

#[test]
fn test_text_summary_names_the_offending_commit() {
    let mut cmd = assert_cmd::Command::cargo_bin("asv-watcher").unwrap();
    cmd.arg(fixture_path())
        .arg("-w")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains(hash_22()))
        .stdout(predicate::str::contains("benchmarks"));
}

#[test]
fn test_json_output_parses_and_flags_revision_22() {
    let mut cmd = assert_cmd::Command::cargo_bin("asv-watcher").unwrap();
    let output = cmd
        .arg(fixture_path())
        .arg("-w")
        .arg("5")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["config"]["window_size"], 5);
    let regressions = value["regressions"].as_array().unwrap();
    assert_eq!(regressions.len(), 3);
    assert!(regressions.iter().all(|r| r["revision"] == 22));
}

#[test]
fn test_expr_filter_restricts_benchmarks() {
    let mut cmd = assert_cmd::Command::cargo_bin("asv-watcher").unwrap();
    let output = cmd
        .arg(fixture_path())
        .arg("-w")
        .arg("5")
        .arg("-e")
        .arg("WithParameter")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let regressions = value["regressions"].as_array().unwrap();
    assert_eq!(regressions.len(), 2);
    assert!(regressions
        .iter()
        .all(|r| r["name"].as_str().unwrap().contains("WithParameter")));
}

#[test]
fn test_hash_report_shows_commit_range() {
    let mut cmd = assert_cmd::Command::cargo_bin("asv-watcher").unwrap();
    cmd.arg(fixture_path())
        .arg("-w")
        .arg("5")
        .arg("--hash")
        .arg(hash_22())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{:040x}...{:040x}", 21, 22)))
        .stdout(predicate::str::contains("x=0.001"));
}

#[test]
fn test_hash_json_summary_is_scoped_to_filter() {
    let mut cmd = assert_cmd::Command::cargo_bin("asv-watcher").unwrap();
    let output = cmd
        .arg(fixture_path())
        .arg("-w")
        .arg("5")
        .arg("--hash")
        .arg(hash_22())
        .arg("-e")
        .arg("WithParameter")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let regressions = value["regressions"].as_array().unwrap();
    assert_eq!(regressions.len(), 2);

    // The rollup covers the same rows as the regression list, not the
    // whole unfiltered collection.
    let summary = value["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0]["commit_hash"], hash_22());
    assert_eq!(summary[0]["benchmarks"], 2);
}

#[test]
fn test_invalid_window_size_fails() {
    let mut cmd = assert_cmd::Command::cargo_bin("asv-watcher").unwrap();
    cmd.arg(fixture_path())
        .arg("-w")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("window_size"));
}

#[test]
fn test_invalid_regex_fails() {
    let mut cmd = assert_cmd::Command::cargo_bin("asv-watcher").unwrap();
    cmd.arg(fixture_path())
        .arg("-e")
        .arg("[unclosed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("regular expression"));
}

#[test]
fn test_missing_collection_fails() {
    let mut cmd = assert_cmd::Command::cargo_bin("asv-watcher").unwrap();
    cmd.arg("/nonexistent/collection")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load collection"));
}
