//! netfeat: Network-Security Feature Engineering CLI
//!
//! Loads a table of network traffic records, runs the feature-engineering
//! pipeline over it and writes the enriched table plus a JSON run report.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use netfeat::cli::Cli;
use netfeat::pipeline::{dataset_shape, load_dataset, save_dataset, Pipeline};
use netfeat::report::{display_run_report, export_run_report};
use netfeat::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = !cli.quiet;

    let input = cli.input.clone();
    let output_path = cli.output_path();
    let report_path = cli.report_path();
    let config = cli.pipeline_config()?;

    if verbose {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(&input, &output_path, &config);
    }

    let pipeline = Pipeline::new(config)
        .context("Invalid pipeline configuration")?
        .with_progress(verbose);

    // Step 1: Load dataset
    if verbose {
        print_step_header(1, "Load Dataset");
    }
    let step_start = Instant::now();
    let df = load_dataset(&input, cli.infer_schema_length)?;
    let (rows, cols, memory_mb) = dataset_shape(&df);
    if verbose {
        print_success("Dataset loaded");
        println!("\n    {} Dataset Statistics:", style("✧").cyan());
        println!("      Rows: {}", rows);
        println!("      Columns: {}", cols);
        println!("      Estimated memory: {:.2} MB", memory_mb);
        print_step_time(step_start.elapsed());
    }

    // Step 2: Run the pipeline
    if verbose {
        print_step_header(2, "Feature Engineering");
    }
    let step_start = Instant::now();
    let output = pipeline
        .run(df)
        .with_context(|| format!("Pipeline failed on {}", input.display()))?;
    let mut dataset = output.dataset;
    let report = output.report;

    if report.features.dropped_empty_payloads > 0 {
        eprintln!(
            "Warning: dropped {} row(s) with an empty payload",
            report.features.dropped_empty_payloads
        );
    }
    if verbose {
        if let Some(outliers) = &report.outliers {
            print_count(
                "row(s) removed as outliers",
                outliers.rows_removed,
                Some(&format!("(of {})", outliers.rows_examined)),
            );
        }
        print_step_time(step_start.elapsed());
    }

    // Step 3: Save output and report
    if verbose {
        print_step_header(3, "Save Results");
    }
    let step_start = Instant::now();
    let spinner = if verbose {
        Some(create_spinner("Writing output file..."))
    } else {
        None
    };
    save_dataset(&mut dataset, &output_path)?;
    export_run_report(&report, pipeline.config(), &input, &output_path, &report_path)?;
    if let Some(spinner) = spinner {
        finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
        print_info(&format!("Run report written to {}", report_path.display()));
        print_step_time(step_start.elapsed());
    }

    if verbose {
        display_run_report(&report);
        print_completion();
    }

    Ok(())
}
