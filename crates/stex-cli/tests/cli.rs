//! Command-level tests for the `stex` binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("stex")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_missing_input_fails() {
    Command::cargo_bin("stex")
        .unwrap()
        .args(["process", "/no/such/statement.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_batch_without_matches_fails() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = format!("{}/*.pdf", dir.path().display());
    Command::cargo_bin("stex")
        .unwrap()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No PDF files match"));
}

#[test]
fn test_unreadable_pdf_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.pdf");
    std::fs::write(&path, b"not a pdf").unwrap();
    Command::cargo_bin("stex")
        .unwrap()
        .args(["process", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PDF"));
}
