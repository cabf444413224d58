//! Command-line argument definitions using clap

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{IvOptions, TargetMapping, WoeOptions};

/// ivscreen - Rank dataset features by Information Value against a binary target
#[derive(Parser, Debug)]
#[command(name = "ivscreen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Binary target column name (values 0/1, or mapped with --event-value/--non-event-value)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Value in target column that represents a response (maps to 1).
    /// Required with --non-event-value when target is not binary 0/1.
    #[arg(long, global = true)]
    pub event_value: Option<String>,

    /// Value in target column that represents a non-response (maps to 0).
    /// Required with --event-value when target is not binary 0/1.
    #[arg(long, global = true)]
    pub non_event_value: Option<String>,

    /// Number of rank-quantile bins for numeric variables
    #[arg(long, default_value = "10", value_parser = validate_bins, global = true)]
    pub bins: usize,

    /// Drop rows with missing values from the bins instead of keeping a "Missing" bin
    #[arg(long, default_value = "false", global = true)]
    pub no_fill_na: bool,

    /// Columns to exclude from the analysis (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Skip variables whose missing-value percentage is at or above this value (0-100)
    #[arg(long, default_value = "50.0", value_parser = validate_missing_threshold)]
    pub missing_threshold: f64,

    /// Include the per-variable WoE tables in the output
    #[arg(long, default_value = "false")]
    pub woe_tables: bool,

    /// JSON output path for the IV analysis.
    /// Defaults to input directory with '_iv_analysis' suffix (e.g., data.csv -> data_iv_analysis.json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000", global = true)]
    pub infer_schema_length: usize,

    /// Suppress the per-variable progress bar
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the Weight of Evidence table of a single variable
    Woe {
        /// Variable (column) to bin
        variable: String,

        /// Optional JSON output path for the table
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Get the JSON output path, deriving it from the input if not explicitly provided.
    pub fn output_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(self.output.clone().unwrap_or_else(|| {
            let parent = input.parent().unwrap_or_else(|| Path::new("."));
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            parent.join(format!("{}_iv_analysis.json", stem))
        }))
    }

    /// Target mapping from --event-value/--non-event-value, which must be given together
    pub fn target_mapping(&self) -> Result<Option<TargetMapping>> {
        match (&self.event_value, &self.non_event_value) {
            (Some(event), Some(non_event)) => {
                Ok(Some(TargetMapping::new(event.clone(), non_event.clone())))
            }
            (None, None) => Ok(None),
            _ => anyhow::bail!("--event-value and --non-event-value must be used together"),
        }
    }

    pub fn iv_options(&self) -> Result<IvOptions> {
        Ok(IvOptions {
            bins: self.bins,
            fill_na: !self.no_fill_na,
            rm_cols: self.drop_columns.clone(),
            woe_table: self.woe_tables,
            missing_threshold: self.missing_threshold,
            target_mapping: self.target_mapping()?,
            show_progress: !self.quiet,
        })
    }

    pub fn woe_options(&self) -> Result<WoeOptions> {
        Ok(WoeOptions {
            bins: self.bins,
            fill_na: !self.no_fill_na,
            target_mapping: self.target_mapping()?,
        })
    }
}

/// Validator for the bins parameter
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid positive integer", s))?;

    if value == 0 {
        Err("bins must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for the missing_threshold parameter
fn validate_missing_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=100.0).contains(&value) {
        Err(format!(
            "missing_threshold must be between 0.0 and 100.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
