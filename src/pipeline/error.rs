//! Error types for WOE/IV analysis.

use polars::prelude::{Column, DataFrame, PolarsError};
use thiserror::Error;

/// Errors raised while validating inputs or computing WOE/IV statistics.
///
/// Degenerate statistics (a variable with no responses or no non-responses)
/// are not errors: they surface as NaN or infinite WOE/IV values.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The dataset has no rows.
    #[error("Dataset is empty - nothing to analyze")]
    EmptyDataset,

    /// A column named by the caller (target or variable) is not in the dataset.
    #[error("Column '{name}' not found. Available columns: {available:?}")]
    ColumnNotFound {
        name: String,
        available: Vec<String>,
    },

    /// A column listed for exclusion does not exist.
    #[error("Cannot exclude unknown column '{0}'")]
    UnknownColumn(String),

    /// The requested bin count is zero.
    #[error("Number of bins must be a positive integer, got {0}")]
    InvalidBins(usize),

    /// The target column has no rows.
    #[error("Target column '{0}' is empty")]
    EmptyTarget(String),

    /// Every value of the target column is null.
    #[error("Target column '{0}' contains only null values")]
    AllNullTarget(String),

    /// The target column holds values other than 0 and 1.
    #[error("Target column '{target}' must be binary (0/1). Found {count} unique values: {values:?}")]
    NonBinaryTarget {
        target: String,
        count: usize,
        values: Vec<String>,
    },

    /// Error bubbled up from polars while reading or casting a column.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

/// Look up a column, reporting the available names when it is absent
pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> AnalysisResult<&'a Column> {
    df.column(name).map_err(|_| AnalysisError::ColumnNotFound {
        name: name.to_string(),
        available: df.get_column_names().iter().map(|s| s.to_string()).collect(),
    })
}
