//! ivscreen: Information Value screening CLI
//!
//! Ranks every feature of a CSV or Parquet dataset by its Information Value
//! against a binary target and writes the results to JSON.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use ivscreen::cli::{target::check_target, woe::run_woe, Cli, Commands};
use ivscreen::pipeline::{compute_iv, dataset_stats, load_dataset};
use ivscreen::report::{display_iv_summary, display_iv_tables, export_iv_report, ExportParams};
use ivscreen::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let target = cli.target.clone().ok_or_else(|| {
        anyhow::anyhow!("Target column is required. Use -t/--target to specify.")
    })?;

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Woe { variable, json } => run_woe(
                input,
                &target,
                variable,
                &cli.woe_options()?,
                json.as_deref(),
                cli.infer_schema_length,
            ),
        };
    }

    let options = cli.iv_options()?;
    let output_path = cli
        .output_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive an output path from the input"))?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        input,
        target: &target,
        output: &output_path,
        bins: options.bins,
        fill_na: options.fill_na,
        missing_threshold: options.missing_threshold,
    });

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");
    check_target(&df, &target, options.target_mapping.as_ref())?;

    let (rows, cols, memory_mb) = dataset_stats(&df);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Step 2: WoE binning and IV per variable
    print_step_header(2, "Information Value Analysis");

    let step_start = Instant::now();
    let report = compute_iv(&df, &target, &options)?;

    print_count("variable(s) analyzed", report.summary.len(), None);
    if report.skipped.is_empty() {
        print_info("No variables exceed the missing value threshold");
    } else {
        print_count(
            "variable(s) skipped for missing values",
            report.skipped.len(),
            Some(&format!("(≥{:.1}%)", options.missing_threshold)),
        );
    }
    print_step_time(step_start.elapsed());

    display_iv_summary(&report);
    display_iv_tables(&report);

    // Step 3: Save results
    print_step_header(3, "Save Results");

    let step_start = Instant::now();
    let input_file = input.display().to_string();
    export_iv_report(
        &report,
        &output_path,
        &ExportParams {
            input_file: &input_file,
            target_column: &target,
            options: &options,
        },
    )?;
    print_success(&format!("Saved to {}", output_path.display()));
    print_step_time(step_start.elapsed());

    print_completion();

    Ok(())
}
