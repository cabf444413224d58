//! Up-front check that the target can be used as given

use anyhow::Result;
use polars::prelude::DataFrame;

use crate::pipeline::{analyze_target_column, TargetAnalysis, TargetMapping};

/// Number of distinct target values listed in the error message
const PREVIEW_LIMIT: usize = 10;

/// Fail early with a usage hint when the target is not 0/1 and no mapping was given
///
/// With a mapping the labels are checked later, when the target is binarized.
pub fn check_target(df: &DataFrame, target: &str, mapping: Option<&TargetMapping>) -> Result<()> {
    if mapping.is_some() {
        return Ok(());
    }

    match analyze_target_column(df, target)? {
        TargetAnalysis::AlreadyBinary => Ok(()),
        TargetAnalysis::NeedsMapping { unique_values } => {
            let mut preview = unique_values
                .iter()
                .take(PREVIEW_LIMIT)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if unique_values.len() > PREVIEW_LIMIT {
                preview.push_str(", ...");
            }
            anyhow::bail!(
                "Target column '{}' is not binary 0/1 ({} distinct values: {}). \
                 Map it with --event-value <VALUE> --non-event-value <VALUE>",
                target,
                unique_values.len(),
                preview
            )
        }
    }
}
