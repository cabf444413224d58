//! Target column validation and mapping
//!
//! The response target must be binary 0/1. Columns holding other labels
//! (e.g. "good"/"bad") can be mapped onto 0/1 with a `TargetMapping`.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{require_column, AnalysisError, AnalysisResult};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Mapping configuration for converting target column values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (response)
    pub event_value: String,
    /// Value that maps to 0 (non-response)
    pub non_event_value: String,
}

impl TargetMapping {
    pub fn new(event_value: impl Into<String>, non_event_value: impl Into<String>) -> Self {
        Self {
            event_value: event_value.into(),
            non_event_value: non_event_value.into(),
        }
    }
}

/// Result of analyzing a target column
#[derive(Debug, Clone)]
pub enum TargetAnalysis {
    /// Target column is already binary 0/1, no mapping needed
    AlreadyBinary,
    /// Target column needs mapping - contains these unique values
    NeedsMapping { unique_values: Vec<String> },
}

/// Analyze a target column to determine if it needs value mapping
pub fn analyze_target_column(df: &DataFrame, target: &str) -> AnalysisResult<TargetAnalysis> {
    let target_col = require_column(df, target)?;
    check_not_empty(target_col, target)?;

    if target_col.dtype().is_primitive_numeric() || matches!(target_col.dtype(), DataType::Boolean) {
        let unique_values = unique_floats(target_col)?;
        if is_binary(&unique_values) {
            return Ok(TargetAnalysis::AlreadyBinary);
        }
    }

    let unique_values = unique_strings(target_col)?;
    Ok(TargetAnalysis::NeedsMapping { unique_values })
}

/// Validate that the target column is binary (contains only 0 and 1)
///
/// Nulls are tolerated; rows with a null target count as neither response
/// nor non-response.
pub fn validate_binary_target(df: &DataFrame, target: &str) -> AnalysisResult<()> {
    let target_col = require_column(df, target)?;
    check_not_empty(target_col, target)?;

    let binary = (target_col.dtype().is_primitive_numeric()
        || matches!(target_col.dtype(), DataType::Boolean))
        && is_binary(&unique_floats(target_col)?);

    if !binary {
        let values = unique_strings(target_col)?;
        return Err(AnalysisError::NonBinaryTarget {
            target: target.to_string(),
            count: values.len(),
            values,
        });
    }

    Ok(())
}

/// Resolve the target column into per-row 0/1 values.
///
/// Without a mapping the column must already be binary. With a mapping,
/// values matching neither side become `None` and are ignored in the counts.
pub fn target_values(
    df: &DataFrame,
    target: &str,
    mapping: Option<&TargetMapping>,
) -> AnalysisResult<Vec<Option<i32>>> {
    match mapping {
        Some(mapping) => create_target_mask(df, target, mapping),
        None => {
            validate_binary_target(df, target)?;
            let float_col = require_column(df, target)?.cast(&DataType::Float64)?;
            let values = float_col
                .f64()?
                .into_iter()
                .map(|v| v.map(|x| x.round() as i32))
                .collect();
            Ok(values)
        }
    }
}

/// Create a binary target mask based on the mapping
///
/// Returns `Some(1)` for event values, `Some(0)` for non-event values and
/// `None` for values that match neither.
pub fn create_target_mask(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> AnalysisResult<Vec<Option<i32>>> {
    let target_col = require_column(df, target)?;
    check_not_empty(target_col, target)?;

    let mask = column_to_string_vec(target_col)?
        .into_iter()
        .map(|v| match v {
            Some(s) if s == mapping.event_value => Some(1),
            Some(s) if s == mapping.non_event_value => Some(0),
            _ => None,
        })
        .collect();

    Ok(mask)
}

fn check_not_empty(col: &Column, target: &str) -> AnalysisResult<()> {
    if col.len() == 0 {
        return Err(AnalysisError::EmptyTarget(target.to_string()));
    }
    if col.null_count() == col.len() {
        return Err(AnalysisError::AllNullTarget(target.to_string()));
    }
    Ok(())
}

fn is_binary(unique_values: &[f64]) -> bool {
    unique_values.len() <= 2
        && unique_values
            .iter()
            .all(|&v| v.abs() < TOLERANCE || (v - 1.0).abs() < TOLERANCE)
}

fn unique_floats(col: &Column) -> AnalysisResult<Vec<f64>> {
    let unique = col.cast(&DataType::Float64)?.unique()?;
    let values = unique.f64()?.into_iter().flatten().collect();
    Ok(values)
}

/// Unique non-null values as sorted strings
fn unique_strings(col: &Column) -> AnalysisResult<Vec<String>> {
    let mut values: Vec<String> = column_to_string_vec(&col.unique()?)?
        .into_iter()
        .flatten()
        .collect();
    values.sort();
    Ok(values)
}

/// Convert a column to a Vec of Option<String> for comparison
fn column_to_string_vec(col: &Column) -> AnalysisResult<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
