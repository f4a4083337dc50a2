//! Run report export to JSON

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{PipelineConfig, RunReport};

/// Metadata about the run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (RFC 3339, UTC)
    pub timestamp: String,
    /// netfeat version
    pub netfeat_version: String,
    pub input_file: String,
    pub output_file: String,
    pub target_column: String,
}

/// Complete run export: metadata, the configuration used and every stage result
#[derive(Serialize)]
pub struct RunExport<'a> {
    pub metadata: RunMetadata,
    pub config: &'a PipelineConfig,
    #[serde(flatten)]
    pub report: &'a RunReport,
}

/// Build the export document for a finished run
pub fn build_export<'a>(
    report: &'a RunReport,
    config: &'a PipelineConfig,
    input: &Path,
    output: &Path,
) -> RunExport<'a> {
    RunExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            netfeat_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input.display().to_string(),
            output_file: output.display().to_string(),
            target_column: config.target.clone(),
        },
        config,
        report,
    }
}

/// Write the run report as pretty JSON
pub fn export_run_report(
    report: &RunReport,
    config: &PipelineConfig,
    input: &Path,
    output: &Path,
    report_path: &Path,
) -> Result<()> {
    let export = build_export(report, config, input, output);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize run report to JSON")?;

    std::fs::write(report_path, json)
        .with_context(|| format!("Failed to write run report to {}", report_path.display()))?;

    Ok(())
}
