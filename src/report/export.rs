//! JSON export of IV reports and WoE tables

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{IvOptions, IvReport, TargetMapping, WoeTable};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// ivscreen version
    pub ivscreen_version: String,
    /// Input file path
    pub input_file: String,
    /// Target column name
    pub target_column: String,
    /// Target value mapping (if used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_mapping: Option<TargetMapping>,
    /// Number of bins for numeric variables
    pub num_bins: usize,
    /// Whether missing values were kept as their own bin
    pub fill_na: bool,
    /// Missing-value percentage at which variables were skipped
    pub missing_threshold: f64,
    /// Columns excluded from the analysis
    pub excluded_columns: Vec<String>,
}

/// Summary statistics of the analysis
#[derive(Serialize)]
pub struct AnalysisSummary {
    pub variables_analyzed: usize,
    pub variables_skipped: usize,
    /// Average over finite IVs only
    pub avg_iv: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_variable: Option<String>,
}

/// Complete IV export with metadata
#[derive(Serialize)]
pub struct IvAnalysisExport<'a> {
    pub metadata: AnalysisMetadata,
    pub summary: AnalysisSummary,
    pub results: &'a IvReport,
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub target_column: &'a str,
    pub options: &'a IvOptions,
}

/// Export an IV report to a pretty-printed JSON file
///
/// Non-finite statistics (NaN, infinite WoE) are written as `null`.
pub fn export_iv_report(report: &IvReport, output_path: &Path, params: &ExportParams) -> Result<()> {
    let finite: Vec<f64> = report
        .summary
        .iter()
        .map(|r| r.iv)
        .filter(|iv| iv.is_finite())
        .collect();
    let avg_iv = if finite.is_empty() {
        0.0
    } else {
        finite.iter().sum::<f64>() / finite.len() as f64
    };

    let export = IvAnalysisExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            ivscreen_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            target_column: params.target_column.to_string(),
            target_mapping: params.options.target_mapping.clone(),
            num_bins: params.options.bins,
            fill_na: params.options.fill_na,
            missing_threshold: params.options.missing_threshold,
            excluded_columns: params.options.rm_cols.clone(),
        },
        summary: AnalysisSummary {
            variables_analyzed: report.summary.len(),
            variables_skipped: report.skipped.len(),
            avg_iv,
            top_variable: report.summary.iter().next().map(|r| r.var.clone()),
        },
        results: report,
    };

    write_json(&export, output_path)
}

/// Export a single-variable WoE table to a pretty-printed JSON file
pub fn export_woe_table(table: &WoeTable, output_path: &Path) -> Result<()> {
    write_json(table, output_path)
}

fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize analysis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis to {}", output_path.display()))?;

    Ok(())
}
