//! Integration tests for the vita binary.
//!
//! These tests verify end-to-end behavior including:
//! - Measurement recording and validation
//! - Dashboard and history output
//! - Bulk deletion semantics
//! - Report generation
//! - Damage table analysis

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("vita"))
}

fn record(data_dir: &std::path::Path, name: &str, height: &str, weight: &str) {
    cli()
        .arg("record")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--name")
        .arg(name)
        .arg("--height")
        .arg(height)
        .arg("--weight")
        .arg(weight)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Personal BMI and calorie tracking dashboard",
        ));
}

#[test]
fn test_record_derives_bmi_and_status() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("record")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .arg("--height")
        .arg("170")
        .arg("--weight")
        .arg("70")
        .assert()
        .success()
        .stdout(predicate::str::contains("24.22"))
        .stdout(predicate::str::contains("overweight"));

    // Verify the database file was created
    assert!(temp_dir.path().join("bmi.db").exists());
}

#[test]
fn test_record_rejects_non_positive_height() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("record")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .arg("--height")
        .arg("0")
        .arg("--weight")
        .arg("70")
        .assert()
        .failure()
        .stderr(predicate::str::contains("height must be positive"));

    // Nothing was written
    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No records yet."));
}

#[test]
fn test_record_rejects_empty_name() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("record")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("")
        .arg("--height")
        .arg("170")
        .arg("--weight")
        .arg("70")
        .assert()
        .failure()
        .stderr(predicate::str::contains("name must not be empty"));
}

#[test]
fn test_history_lists_records() {
    let temp_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");
    record(temp_dir.path(), "lee", "160", "50");

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("kim"))
        .stdout(predicate::str::contains("lee"))
        .stdout(predicate::str::contains("24.22"));
}

#[test]
fn test_history_json_export() {
    let temp_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");

    let output = cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value =
        serde_json::from_slice(&output).expect("history --json should emit valid JSON");
    let records = parsed.as_array().expect("expected a JSON array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "kim");
    assert_eq!(records[0]["status"], "overweight");
}

#[test]
fn test_status_shows_calorie_analysis() {
    let temp_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .arg("--age")
        .arg("30")
        .arg("--sex")
        .arg("male")
        .arg("--activity")
        .arg("sedentary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Latest BMI: 24.22 (overweight)"))
        .stdout(predicate::str::contains("BMR:  1617 kcal"))
        .stdout(predicate::str::contains("TDEE: 1941 kcal"))
        .stdout(predicate::str::contains("cut"));
}

#[test]
fn test_status_trend_against_previous_record() {
    let temp_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");
    record(temp_dir.path(), "kim", "170", "60");

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .assert()
        .success()
        .stdout(predicate::str::contains("Latest BMI: 20.76 (normal)"))
        .stdout(predicate::str::contains("BMI down"));
}

#[test]
fn test_status_unknown_subject_lists_known_names() {
    let temp_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("nobody")
        .assert()
        .success()
        .stdout(predicate::str::contains("No records for nobody"))
        .stdout(predicate::str::contains("Known subjects: kim"));
}

#[test]
fn test_status_rejects_unknown_activity() {
    let temp_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .arg("--activity")
        .arg("extreme")
        .assert()
        .failure()
        .stderr(predicate::str::contains("extreme"));
}

#[test]
fn test_delete_by_ids() {
    let temp_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");
    record(temp_dir.path(), "kim", "170", "71");

    cli()
        .arg("delete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .arg("--ids")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 records"));

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .assert()
        .success()
        .stdout(predicate::str::contains("71.0"));
}

#[test]
fn test_delete_unknown_ids_is_a_noop() {
    let temp_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");

    cli()
        .arg("delete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .arg("--ids")
        .arg("100,200")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 0 records"));

    // The store is unchanged
    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("kim"));
}

#[test]
fn test_report_writes_artifact() {
    let temp_dir = setup_test_dir();
    let out_dir = setup_test_dir();

    record(temp_dir.path(), "kim", "170", "70");

    cli()
        .arg("report")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--name")
        .arg("kim")
        .arg("--out")
        .arg(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let report_path = out_dir.path().join("kim_health_report.txt");
    assert!(report_path.exists());

    let contents = fs::read_to_string(&report_path).expect("Failed to read report");
    assert!(contents.contains("Personal Health Report"));
    assert!(contents.contains("Name: kim"));
    assert!(contents.contains("BMI: 24.22 (overweight)"));
    assert!(contents.contains("Recommended intake:"));
}

#[test]
fn test_damage_summary_and_forecast() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("damage.csv");
    fs::write(
        &csv_path,
        "region,2010,2011,2012\nalpha,10.0,20.0,30.0\nbeta,1.0,1.0,1.0\n",
    )
    .unwrap();

    cli()
        .arg("damage")
        .arg("--csv")
        .arg(&csv_path)
        .arg("--top")
        .arg("2")
        .arg("--forecast")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Yearly damage totals"))
        .stdout(predicate::str::contains("2010  11.00 ha"))
        .stdout(predicate::str::contains("1. alpha"))
        .stdout(predicate::str::contains("Forecast (next 2 years)"))
        .stdout(predicate::str::contains("2013"))
        .stdout(predicate::str::contains("2014"));
}

#[test]
fn test_damage_forecast_clamps_at_zero() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("damage.csv");
    fs::write(
        &csv_path,
        "region,2010,2011,2012\nalpha,30.0,15.0,0.0\n",
    )
    .unwrap();

    cli()
        .arg("damage")
        .arg("--csv")
        .arg(&csv_path)
        .arg("--forecast")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("2013  0.00 ha"));
}

#[test]
fn test_damage_missing_csv_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("damage")
        .arg("--csv")
        .arg(temp_dir.path().join("missing.csv"))
        .assert()
        .failure();
}
