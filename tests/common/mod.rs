//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Small dataset with a binary target and one variable of each kind
///
/// - `target`: 0/1 target, 3 responses and 2 non-responses
/// - `score`: numeric variable with a tie
/// - `segment`: categorical variable with one missing value
pub fn create_small_dataframe() -> DataFrame {
    df! {
        "target" => [1i32, 0, 1, 1, 0],
        "score" => [5.0f64, 3.0, 5.0, 8.0, 1.0],
        "segment" => [Some("a"), Some("b"), None, Some("a"), Some("b")],
    }
    .unwrap()
}

/// Dataset mirroring a typical screening input
///
/// - `targetLabel`: binary target, 50/50 split
/// - `targetLabel2`: a second label that must be excluded from analysis
/// - `predictive`: separates the classes well
/// - `noise`: random-looking numeric feature
/// - `region`: categorical feature
/// - `mostly_missing`: 60% missing, skipped at the default threshold
/// - `half_missing`: exactly 50% missing, skipped at the default threshold
pub fn create_screening_dataframe() -> DataFrame {
    df! {
        "targetLabel" => [0i32, 0, 0, 0, 0, 1, 1, 1, 1, 1],
        "targetLabel2" => [1i32, 0, 1, 0, 1, 0, 1, 0, 1, 0],
        "predictive" => [1.0f64, 2.0, 1.5, 2.5, 3.0, 8.0, 9.0, 8.5, 9.5, 10.0],
        "noise" => [5.0f64, 8.0, 2.0, 9.0, 1.0, 3.0, 7.0, 4.0, 6.0, 0.0],
        "region" => ["north", "south", "north", "south", "east", "east", "north", "south", "east", "north"],
        "mostly_missing" => [Some(1.0f64), None, None, Some(4.0), None, None, Some(7.0), None, Some(9.0), None],
        "half_missing" => [Some(1.0f64), None, Some(3.0), None, Some(5.0), None, Some(7.0), None, Some(9.0), None],
    }
    .unwrap()
}

/// Create a DataFrame with specific missing value patterns
pub fn create_missing_test_dataframe() -> DataFrame {
    df! {
        "col_complete" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        "col_20pct_missing" => [Some(1.0f64), None, Some(3.0), Some(4.0), Some(5.0)], // 20% missing
        "col_40pct_missing" => [Some(1.0f64), Some(2.0), None, None, Some(5.0)], // 40% missing
        "col_all_missing" => [None::<f64>, None, None, None, None], // 100% missing
        "target" => [0i32, 1, 0, 1, 0],
    }
    .unwrap()
}

/// Create a larger random DataFrame for stress tests
pub fn create_large_test_dataframe(rows: usize, cols: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);

    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("target".into(), target));

    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats are equal within a small tolerance
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
