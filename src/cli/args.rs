//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::pipeline::{EmptyPayloadPolicy, OutlierTail, PipelineConfig};

/// netfeat - Turn raw network-security event logs into an engineered feature table
#[derive(Parser, Debug)]
#[command(name = "netfeat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Defaults to input directory with '_processed' suffix (e.g., logs.csv → logs_processed.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target column scored against by the chi-square feature selector.
    /// Overrides the value from --config (default: "Attack Type").
    #[arg(short, long)]
    pub target: Option<String>,

    /// JSON pipeline configuration file. Fields not present take their defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path of the JSON run report.
    /// Defaults to '<input stem>_report.json' next to the output file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Z-score threshold above which a row is removed as an outlier
    #[arg(long, value_parser = validate_outlier_threshold)]
    pub outlier_threshold: Option<f64>,

    /// Which z-scores count as outliers.
    /// Options: "both" (|z| > threshold, default) or "upper" (z > threshold only)
    #[arg(long)]
    pub outlier_tail: Option<OutlierTail>,

    /// Skip the outlier filter entirely
    #[arg(long, default_value = "false")]
    pub no_outlier_filter: bool,

    /// Remove exact duplicate rows (first occurrence kept)
    #[arg(long, default_value = "false")]
    pub drop_duplicates: bool,

    /// Handling of rows with an empty payload.
    /// Options: "fail" (default), "drop", or "sentinel:<value>"
    #[arg(long)]
    pub empty_payload: Option<EmptyPayloadPolicy>,

    /// Append '<column> Scaled' standardized columns to the output
    #[arg(long, default_value = "false")]
    pub append_scaled: bool,

    /// Append principal component scores (PC1, PC2, ...) to the output
    #[arg(long, default_value = "false")]
    pub append_components: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Suppress the banner, progress spinners and console tables
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Output path, derived from the input if not explicitly provided.
    /// The derived path is in the input's directory with a '_processed' suffix.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self.input.parent().unwrap_or_else(|| Path::new("."));
            let stem = input_stem(&self.input);
            let extension = self
                .input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("csv");
            parent.join(format!("{}_processed.{}", stem, extension))
        })
    }

    /// Report path, derived from the input stem and placed next to the output
    pub fn report_path(&self) -> PathBuf {
        self.report.clone().unwrap_or_else(|| {
            let output = self.output_path();
            let parent = output.parent().unwrap_or_else(|| Path::new("."));
            parent.join(format!("{}_report.json", input_stem(&self.input)))
        })
    }

    /// Pipeline configuration: the --config file (or defaults) with flag overrides applied
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(target) = &self.target {
            config = config.with_target(target.clone());
        }
        if let Some(threshold) = self.outlier_threshold {
            config = config.with_outlier_threshold(threshold);
        }
        if let Some(tail) = self.outlier_tail {
            config = config.with_outlier_tail(tail);
        }
        if let Some(policy) = self.empty_payload {
            config = config.with_empty_payload(policy);
        }
        if self.no_outlier_filter {
            config = config.with_outlier_filter(false);
        }
        if self.drop_duplicates {
            config = config.with_drop_duplicates(true);
        }
        if self.append_scaled {
            config = config.with_appended_scaled_columns(true);
        }
        if self.append_components {
            config = config.with_appended_components(true);
        }

        Ok(config)
    }
}

fn input_stem(input: &Path) -> &str {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
}

/// Validator for outlier_threshold parameter
fn validate_outlier_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!(
            "outlier_threshold must be a positive number, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
