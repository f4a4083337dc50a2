//! Error taxonomy for the feature-engineering pipeline.
//!
//! Every stage reports failures through [`PipelineError`]. Apart from
//! configuration problems, each variant names the [`Stage`] that failed and the
//! offending column so a run terminates with a message a user can act on.

use std::fmt;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Result alias used throughout the pipeline
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// Pipeline stage, used to attribute errors and timings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loader,
    Cleaner,
    FeatureEngineer,
    Discretizer,
    Binarizer,
    IpClassifier,
    Encoder,
    Scaler,
    DimensionalityReducer,
    FeatureSelector,
    OutlierFilter,
    Profiler,
    Skewness,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Loader => "loader",
            Stage::Cleaner => "cleaner",
            Stage::FeatureEngineer => "feature-engineer",
            Stage::Discretizer => "discretizer",
            Stage::Binarizer => "binarizer",
            Stage::IpClassifier => "ip-classifier",
            Stage::Encoder => "encoder",
            Stage::Scaler => "scaler",
            Stage::DimensionalityReducer => "pca",
            Stage::FeatureSelector => "feature-selector",
            Stage::OutlierFilter => "outlier-filter",
            Stage::Profiler => "profiler",
            Stage::Skewness => "skewness",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An expected column is absent from the dataset
    #[error("[{stage}] schema validation failed: column '{column}' not found")]
    SchemaValidation { stage: Stage, column: String },

    /// A null appeared in a field the pipeline treats as non-nullable
    #[error("[{stage}] null value in column '{column}'{}", fmt_row(.row))]
    NullValue {
        stage: Stage,
        column: String,
        row: Option<usize>,
    },

    /// Division by zero or a non-finite intermediate result
    #[error("[{stage}] computation failed on column '{column}'{}: {message}", fmt_row(.row))]
    Computation {
        stage: Stage,
        column: String,
        row: Option<usize>,
        message: String,
    },

    /// A value outside the domain an encoding or scoring step accepts
    #[error("[{stage}] encoding error in column '{column}': {message}")]
    Encoding {
        stage: Stage,
        column: String,
        message: String,
    },

    /// Invalid pipeline parameters (bin counts, thresholds, component counts)
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

fn fmt_row(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" at row {}", r),
        None => String::new(),
    }
}

impl PipelineError {
    pub fn schema(stage: Stage, column: impl Into<String>) -> Self {
        PipelineError::SchemaValidation {
            stage,
            column: column.into(),
        }
    }

    pub fn null_value(stage: Stage, column: impl Into<String>, row: Option<usize>) -> Self {
        PipelineError::NullValue {
            stage,
            column: column.into(),
            row,
        }
    }

    pub fn computation(
        stage: Stage,
        column: impl Into<String>,
        row: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        PipelineError::Computation {
            stage,
            column: column.into(),
            row,
            message: message.into(),
        }
    }

    pub fn encoding(stage: Stage, column: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Encoding {
            stage,
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        PipelineError::Configuration(message.into())
    }

    /// Stage the error is attributed to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::SchemaValidation { stage, .. }
            | PipelineError::NullValue { stage, .. }
            | PipelineError::Computation { stage, .. }
            | PipelineError::Encoding { stage, .. } => Some(*stage),
            PipelineError::Configuration(_) | PipelineError::Polars(_) => None,
        }
    }
}
