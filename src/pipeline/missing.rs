//! Missing value analysis
//!
//! Variables whose share of missing values reaches the threshold are left out
//! of IV computation and reported with their missing percentage instead.

use std::collections::BTreeMap;

use polars::prelude::*;

use super::binning::VariableValues;
use super::error::{require_column, AnalysisResult};

/// Default missing-value percentage at which a variable is skipped
pub const DEFAULT_MISSING_THRESHOLD: f64 = 50.0;

/// Missing-value percentage (0-100) of each requested column, in the order
/// given. Nulls and NaN floats both count as missing.
pub fn analyze_missing_values(df: &DataFrame, columns: &[String]) -> AnalysisResult<Vec<(String, f64)>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    columns
        .iter()
        .map(|name| {
            let values = VariableValues::from_column(require_column(df, name)?)?;
            let missing_pct = values.missing_count() as f64 / rows * 100.0;
            Ok((name.clone(), missing_pct))
        })
        .collect()
}

/// Split columns into those kept for analysis and those skipped for having
/// a missing percentage at or above `threshold`.
pub fn partition_by_missing(
    missing_pcts: &[(String, f64)],
    threshold: f64,
) -> (Vec<String>, BTreeMap<String, f64>) {
    let mut kept = Vec::new();
    let mut skipped = BTreeMap::new();

    for (name, pct) in missing_pcts {
        if *pct >= threshold {
            skipped.insert(name.clone(), *pct);
        } else {
            kept.push(name.clone());
        }
    }

    (kept, skipped)
}
