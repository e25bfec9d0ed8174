use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_phones(dir: &Path) -> PathBuf {
    let mut text = String::from("brand,ram_gb,price_idr,segment\n");
    for i in 0..30 {
        let line = match i % 3 {
            0 => format!("Lumo,{},Rp {},budget\n", 3 + i % 2, 1_900_000 + i * 1000),
            1 => format!("Orbit,{},Rp {},mid\n", 6 + i % 2, 5_500_000 + i * 1000),
            _ => format!("Zenith,{},Rp {},premium\n", 12 + i % 2, 15_000_000 + i * 1000),
        };
        text.push_str(&line);
    }
    text.push_str("Lumo,4,Rp 2100000,\n");
    let path = dir.join("phones.csv");
    std::fs::write(&path, text).unwrap();
    path
}

fn bayes() -> Command {
    Command::cargo_bin("bayes").unwrap()
}

#[test]
fn columns_reports_types_and_target() {
    let dir = TempDir::new().unwrap();
    let data = write_phones(dir.path());
    bayes()
        .args(["columns", data.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ram_gb\": \"numeric\""))
        .stdout(predicate::str::contains("\"brand\": \"categorical\""))
        .stdout(predicate::str::contains("\"candidate_target\": \"price_idr\""));
}

#[test]
fn train_prints_model_json() {
    let dir = TempDir::new().unwrap();
    let data = write_phones(dir.path());
    let output = bayes()
        .args(["train", data.to_str().unwrap(), "--target", "segment", "--features", "brand,ram_gb"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(model["target_column"], "segment");
    assert_eq!(model["classes"].as_array().unwrap().len(), 3);
}

#[test]
fn evaluate_cv_writes_report() {
    let dir = TempDir::new().unwrap();
    let data = write_phones(dir.path());
    let report = dir.path().join("report.html");
    bayes()
        .args([
            "evaluate",
            data.to_str().unwrap(),
            "--target",
            "segment",
            "--features",
            "brand,ram_gb,price_idr",
            "--mode",
            "cv",
            "--folds",
            "3",
            "--seed",
            "7",
            "--report",
            report.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mean_accuracy\""));
    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("Cross-validation"));
}

#[test]
fn evaluate_manual_with_empty_train_side_fails() {
    let dir = TempDir::new().unwrap();
    let data = write_phones(dir.path());
    bayes()
        .args([
            "evaluate",
            data.to_str().unwrap(),
            "--target",
            "segment",
            "--features",
            "ram_gb",
            "--mode",
            "manual",
            "--train-indices",
            "500",
            "--test-indices",
            "0-5",
            "--no-report",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid split configuration"));
}

#[test]
fn recommend_writes_scored_rows() {
    let dir = TempDir::new().unwrap();
    let data = write_phones(dir.path());
    let scored = dir.path().join("scored.csv");
    let output = bayes()
        .args([
            "recommend",
            data.to_str().unwrap(),
            "--target",
            "segment",
            "--features",
            "brand,ram_gb",
            "--label",
            "premium",
            "--top",
            "3",
            "-o",
            scored.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rec: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rec["strategy"], "by_probability");
    assert_eq!(rec["items"].as_array().unwrap().len(), 3);

    let csv = std::fs::read_to_string(&scored).unwrap();
    assert_eq!(csv.lines().count(), 31);
    assert!(csv.lines().next().unwrap().contains("prob_premium"));
}

#[test]
fn unknown_feature_column_fails() {
    let dir = TempDir::new().unwrap();
    let data = write_phones(dir.path());
    bayes()
        .args(["train", data.to_str().unwrap(), "--target", "segment", "--features", "battery"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("battery"));
}
