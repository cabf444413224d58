//! Tests for CLI argument parsing and the ivscreen binary

use assert_cmd::Command;
use clap::Parser;
use ivscreen::cli::{Cli, Commands};
use ivscreen::pipeline::TargetMapping;
use predicates::prelude::*;
use std::path::PathBuf;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["ivscreen", "-i", "data.csv", "-t", "target"]);

    assert_eq!(cli.bins, 10, "Default bins should be 10");
    assert_eq!(cli.missing_threshold, 50.0, "Default missing threshold should be 50");
    assert!(!cli.no_fill_na, "Missing values should be kept by default");
    assert!(!cli.woe_tables);
    assert!(!cli.quiet);
    assert!(cli.drop_columns.is_empty());
    assert_eq!(
        cli.infer_schema_length, 10000,
        "Default schema inference should be 10000"
    );
    assert!(cli.command.is_none());
}

#[test]
fn test_cli_output_path_derivation() {
    let cli = Cli::parse_from(["ivscreen", "-i", "/path/to/data.csv", "-t", "target"]);

    let output = cli.output_path().unwrap();
    assert_eq!(output, PathBuf::from("/path/to/data_iv_analysis.json"));
}

#[test]
fn test_cli_output_path_derivation_parquet() {
    let cli = Cli::parse_from(["ivscreen", "-i", "/path/to/data.parquet", "-t", "target"]);

    let output = cli.output_path().unwrap();
    assert_eq!(output, PathBuf::from("/path/to/data_iv_analysis.json"));
}

#[test]
fn test_cli_explicit_output_path() {
    let cli = Cli::parse_from(["ivscreen", "-i", "data.csv", "-t", "target", "-o", "custom.json"]);

    assert_eq!(cli.output_path().unwrap(), PathBuf::from("custom.json"));
}

#[test]
fn test_cli_no_input_returns_none() {
    let cli = Cli::parse_from(["ivscreen", "-t", "target"]);

    assert!(cli.input().is_none());
    assert!(cli.output_path().is_none());
}

#[test]
fn test_cli_drop_columns() {
    let cli = Cli::parse_from([
        "ivscreen",
        "-i",
        "data.csv",
        "-t",
        "target",
        "--drop-columns",
        "targetLabel2,id",
    ]);

    assert_eq!(cli.drop_columns, vec!["targetLabel2", "id"]);
}

#[test]
fn test_cli_iv_options() {
    let cli = Cli::parse_from([
        "ivscreen",
        "-i",
        "data.csv",
        "-t",
        "target",
        "--bins",
        "5",
        "--no-fill-na",
        "--missing-threshold",
        "30",
        "--woe-tables",
        "--quiet",
    ]);

    let options = cli.iv_options().unwrap();
    assert_eq!(options.bins, 5);
    assert!(!options.fill_na);
    assert_eq!(options.missing_threshold, 30.0);
    assert!(options.woe_table);
    assert!(!options.show_progress);
    assert!(options.target_mapping.is_none());
}

#[test]
fn test_cli_target_mapping_pair() {
    let cli = Cli::parse_from([
        "ivscreen",
        "-i",
        "data.csv",
        "-t",
        "status",
        "--event-value",
        "bad",
        "--non-event-value",
        "good",
    ]);

    assert_eq!(
        cli.target_mapping().unwrap(),
        Some(TargetMapping::new("bad", "good"))
    );
}

#[test]
fn test_cli_target_mapping_requires_both_values() {
    let cli = Cli::parse_from(["ivscreen", "-i", "data.csv", "-t", "status", "--event-value", "bad"]);

    assert!(cli.target_mapping().is_err());
    assert!(cli.iv_options().is_err());
}

#[test]
fn test_cli_rejects_zero_bins() {
    let result = Cli::try_parse_from(["ivscreen", "-i", "data.csv", "-t", "target", "--bins", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_threshold_boundaries() {
    for ok in ["0", "100", "50.5"] {
        let result = Cli::try_parse_from([
            "ivscreen",
            "-i",
            "data.csv",
            "-t",
            "target",
            "--missing-threshold",
            ok,
        ]);
        assert!(result.is_ok(), "{} should be accepted", ok);
    }

    for bad in ["-1", "100.1", "abc"] {
        let result = Cli::try_parse_from([
            "ivscreen",
            "-i",
            "data.csv",
            "-t",
            "target",
            "--missing-threshold",
            bad,
        ]);
        assert!(result.is_err(), "{} should be rejected", bad);
    }
}

#[test]
fn test_cli_woe_subcommand() {
    let cli = Cli::parse_from([
        "ivscreen", "woe", "score", "-i", "data.csv", "-t", "target", "--bins", "4",
    ]);

    match &cli.command {
        Some(Commands::Woe { variable, json }) => {
            assert_eq!(variable, "score");
            assert!(json.is_none());
        }
        None => panic!("Expected the woe subcommand"),
    }
    assert_eq!(cli.woe_options().unwrap().bins, 4);
}

#[test]
fn test_binary_writes_json_report() {
    let mut df = common::create_screening_dataframe();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut df);

    Command::cargo_bin("ivscreen")
        .unwrap()
        .args(["-i", csv_path.to_str().unwrap(), "-t", "targetLabel"])
        .args(["--drop-columns", "targetLabel2", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INFORMATION VALUE SUMMARY"));

    let output = temp_dir.path().join("test_data_iv_analysis.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();

    let summary = json["results"]["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 3);
    assert!(summary.iter().all(|row| row["Var"] != "targetLabel2"));
    assert!(json["results"]["skipped"]["mostly_missing"].is_number());
    assert!(json["results"].get("woe_tables").is_none());
    assert_eq!(json["metadata"]["target_column"], "targetLabel");
}

#[test]
fn test_binary_unknown_target_fails() {
    let mut df = common::create_screening_dataframe();
    let (_temp_dir, csv_path) = common::create_temp_csv(&mut df);

    Command::cargo_bin("ivscreen")
        .unwrap()
        .args(["-i", csv_path.to_str().unwrap(), "-t", "nope", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_binary_woe_subcommand() {
    let mut df = common::create_screening_dataframe();
    let (temp_dir, csv_path) = common::create_temp_csv(&mut df);
    let json_path = temp_dir.path().join("region_woe.json");

    Command::cargo_bin("ivscreen")
        .unwrap()
        .args(["woe", "region", "-i", csv_path.to_str().unwrap(), "-t", "targetLabel"])
        .args(["--json", json_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("WOE TABLE: region"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["variable"], "region");
    assert_eq!(json["bins"].as_array().unwrap().len(), 3);
}

fn create_labelled_csv() -> (tempfile::TempDir, PathBuf) {
    let mut df = polars::prelude::df! {
        "status" => ["good", "bad", "good", "bad", "good", "review"],
        "utilisation" => [0.1f64, 0.9, 0.2, 0.8, 0.3, 0.5],
    }
    .unwrap();
    common::create_temp_csv(&mut df)
}

#[test]
fn test_binary_label_target_without_mapping_suggests_flags() {
    let (_temp_dir, csv_path) = create_labelled_csv();

    Command::cargo_bin("ivscreen")
        .unwrap()
        .args(["-i", csv_path.to_str().unwrap(), "-t", "status", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad, good, review"))
        .stderr(predicate::str::contains("--event-value"));
}

#[test]
fn test_binary_woe_label_target_without_mapping_fails() {
    let (_temp_dir, csv_path) = create_labelled_csv();

    Command::cargo_bin("ivscreen")
        .unwrap()
        .args(["woe", "utilisation", "-i", csv_path.to_str().unwrap(), "-t", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--non-event-value"));
}

#[test]
fn test_binary_label_target_with_mapping_succeeds() {
    let (temp_dir, csv_path) = create_labelled_csv();

    Command::cargo_bin("ivscreen")
        .unwrap()
        .args(["-i", csv_path.to_str().unwrap(), "-t", "status", "--quiet"])
        .args(["--event-value", "bad", "--non-event-value", "good"])
        .assert()
        .success();

    assert!(temp_dir.path().join("test_data_iv_analysis.json").exists());
}
