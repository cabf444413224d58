//! Single-variable Weight of Evidence table

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;

use super::target::check_target;
use crate::pipeline::{compute_woe, load_dataset, WoeOptions};
use crate::report::{display_woe_table, export_woe_table, format_stat};
use crate::utils::{create_spinner, finish_with_success, print_step_time, print_success};

/// Load a dataset, bin one variable against the target and print its WoE table
///
/// # Arguments
/// * `input` - Path to the CSV or Parquet dataset
/// * `target` - Binary target column name
/// * `variable` - Column to bin
/// * `options` - Binning options
/// * `json` - Optional path to also write the table as JSON
/// * `infer_schema_length` - Number of rows to use for CSV schema inference
pub fn run_woe(
    input: &Path,
    target: &str,
    variable: &str,
    options: &WoeOptions,
    json: Option<&Path>,
    infer_schema_length: usize,
) -> Result<()> {
    println!(
        "\n {} Weight of Evidence for {}",
        style("◆").cyan().bold(),
        style(variable).yellow()
    );
    println!("   Input:  {}", style(input.display()).dim());
    println!("   Target: {}", style(target).dim());
    println!();

    let start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(input, infer_schema_length)?;
    finish_with_success(&spinner, &format!("Loaded {} rows", df.height()));
    check_target(&df, target, options.target_mapping.as_ref())?;

    let table = compute_woe(&df, target, variable, options)
        .with_context(|| format!("Failed to compute WoE for '{}'", variable))?;

    display_woe_table(&table);

    println!();
    println!(
        "   {} responses, {} non-responses, IV {}",
        style(table.total_resp()).yellow(),
        style(table.total_non_resp()).yellow(),
        style(format_stat(table.iv())).cyan().bold()
    );

    if let Some(path) = json {
        export_woe_table(&table, path)?;
        print_success(&format!("Saved to {}", path.display()));
    }

    print_step_time(start.elapsed());
    Ok(())
}
