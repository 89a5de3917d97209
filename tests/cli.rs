//! End-to-end tests for the butterfly-closure binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = "# four nodes\n4\n0 3 - 7\n8 0 2 -\n5 x 0 1\n2 - inf 0\n";
const CLOSED: &str = "4\n0 3 - 7\n8 0 2 15\n5 8 0 1\n2 5 7 0\n";

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("butterfly-closure").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("BUTTERFLY_BLOCK")
        .env_remove("BUTTERFLY_PARALLEL_CUTOFF")
        .env_remove("BUTTERFLY_THREADS");
    cmd
}

fn write_sample(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("graph.txt");
    fs::write(&path, SAMPLE).unwrap();
    path
}

#[test]
fn test_help_and_version() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("solve").and(predicate::str::contains("bench")));

    bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_solve_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir);

    bin()
        .args(["solve", "--block", "2", "--verify"])
        .arg(&input)
        .assert()
        .success()
        .stdout(CLOSED);
}

#[test]
fn test_solve_to_file_sequential() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir);
    let output = dir.path().join("closed.txt");

    bin()
        .args(["solve", "--block", "1", "--sequential", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved to"));

    assert_eq!(fs::read_to_string(&output).unwrap(), CLOSED);
}

#[test]
fn test_block_from_environment() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir);

    bin()
        .env("BUTTERFLY_BLOCK", "3")
        .arg("solve")
        .arg(&input)
        .assert()
        .success()
        .stdout(CLOSED);

    bin()
        .env("BUTTERFLY_BLOCK", "zero")
        .arg("solve")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("BUTTERFLY_BLOCK"));
}

#[test]
fn test_solve_rejects_ragged_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.txt");
    fs::write(&input, "3\n0 1 2\n0 1\n0 1 2\n").unwrap();

    bin()
        .arg("solve")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_solve_missing_file() {
    bin()
        .args(["solve", "/nonexistent/graph.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read matrix"));
}

#[test]
fn test_zero_block_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_sample(&dir);

    bin()
        .args(["solve", "--block", "0"])
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn test_bench_json_report() {
    let output = bin()
        .args([
            "bench", "--n", "40", "--runs", "2", "--block", "4", "--threads", "2", "--verify",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["n"], 40);
    assert_eq!(report["config"]["block"], 4);
    assert_eq!(report["config"]["threads"], 2);
    assert_eq!(report["latency"]["runs"], 2);
    assert_eq!(report["verified"], true);
    assert_eq!(report["recurrence"], "min-plus");
    assert!(report["base_cases"]["diagonal"].as_u64().unwrap() > 0);
}

#[test]
fn test_bench_max_min_sequential() {
    bin()
        .args([
            "bench",
            "--n",
            "24",
            "--runs",
            "1",
            "--recurrence",
            "max-min",
            "--sequential",
            "--verify",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("verified against reference"));
}
