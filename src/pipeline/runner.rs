//! Pipeline driver: runs the enabled stages in order over one dataset
//!
//! Stage order is fixed: cleaning, feature engineering, discretization, IP
//! classes, binarization, encoding, scaling, PCA, chi-square scoring and the
//! outlier filter. Scaling and encoding produce values local to PCA and
//! scoring; the outlier filter and the exported dataset see raw values.
//! Skewness is measured on the PCA feature columns before outliers are removed.

use std::time::Instant;

use polars::prelude::*;
use serde::Serialize;

use super::binarize::{binarize, BinarizeOutcome};
use super::chi_square::{chi_square_scores, ChiSquareScore, EncodedFeature};
use super::cleaner::{drop_duplicates, impute_missing, ImputationRecord};
use super::config::PipelineConfig;
use super::discretize::{bin_equal_width, bin_ports, BinEdges};
use super::encoder::{encode_column, LabelEncoder};
use super::error::{Result, Stage};
use super::features::{engineer_features, FeatureOutcome};
use super::ip_class::add_ip_classes;
use super::loader::validate_schema;
use super::outliers::{filter_outliers, OutlierSummary};
use super::pca::{append_components, fit_pca, PcaResult};
use super::profile::{profile_dataset, skewness_report, ColumnSkew, DatasetProfile};
use super::scaler::{append_scaled_columns, standardize};
use crate::utils::{create_spinner, finish_with_success, hidden_spinner};

/// Wall-clock time spent in one stage
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: String,
    pub seconds: f64,
}

/// Everything a run computed besides the output dataset
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Profile of the dataset as loaded
    pub profile: DatasetProfile,
    pub imputation: Vec<ImputationRecord>,
    pub duplicates_removed: usize,
    pub features: FeatureOutcome,
    pub bin_edges: Vec<BinEdges>,
    pub binarized: Vec<BinarizeOutcome>,
    pub encoders: Vec<LabelEncoder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pca: Option<PcaResult>,
    pub chi_square: Vec<ChiSquareScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<OutlierSummary>,
    /// Skewness of the PCA feature columns, before outlier filtering
    pub skewness: Vec<ColumnSkew>,
    pub final_rows: usize,
    pub final_columns: usize,
    pub timings: Vec<StageTiming>,
}

/// Output dataset together with its run report
pub struct PipelineOutput {
    pub dataset: DataFrame,
    pub report: RunReport,
}

/// A validated pipeline configuration ready to run
pub struct Pipeline {
    config: PipelineConfig,
    progress: bool,
}

impl Pipeline {
    /// Validate `config`; invalid parameters fail before any data is touched
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            progress: false,
        })
    }

    /// Show a spinner per stage on the terminal
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn timed<T>(
        &self,
        stage: Stage,
        timings: &mut Vec<StageTiming>,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let spinner = if self.progress {
            create_spinner(&format!("Running {}...", stage))
        } else {
            hidden_spinner()
        };

        let start = Instant::now();
        let value = f();
        let elapsed = start.elapsed();

        match &value {
            Ok(_) => finish_with_success(&spinner, &format!("{} ({:.2}s)", stage, elapsed.as_secs_f64())),
            Err(_) => spinner.finish_and_clear(),
        }

        timings.push(StageTiming {
            stage: stage.to_string(),
            seconds: elapsed.as_secs_f64(),
        });
        value
    }

    /// Run every enabled stage, consuming the dataset
    ///
    /// Fails fast: the first stage error aborts the run.
    pub fn run(&self, df: DataFrame) -> Result<PipelineOutput> {
        let config = &self.config;
        let mut timings = Vec::new();

        validate_schema(&df, &config.required_columns())?;

        let profile = self.timed(Stage::Profiler, &mut timings, || {
            profile_dataset(&df, &config.target)
        })?;

        let (df, imputation, duplicates_removed) = self.timed(Stage::Cleaner, &mut timings, || {
            let mut df = df;
            let records = impute_missing(&mut df, &config.imputation)?;
            if config.drop_duplicates {
                let before = df.height();
                let df = drop_duplicates(df)?;
                let removed = before - df.height();
                Ok((df, records, removed))
            } else {
                Ok((df, records, 0))
            }
        })?;

        let (mut df, features) = self.timed(Stage::FeatureEngineer, &mut timings, || {
            engineer_features(df, config.empty_payload)
        })?;

        let mut bin_edges = Vec::new();
        if config.stages.discretize {
            bin_edges = self.timed(Stage::Discretizer, &mut timings, || {
                bin_ports(&mut df, &config.port_rules)?;
                bin_equal_width(&mut df, &config.equal_width_rules)
            })?;
        }

        if config.stages.ip_classes {
            self.timed(Stage::IpClassifier, &mut timings, || {
                add_ip_classes(&mut df, &config.ip_columns)
            })?;
        }

        let mut binarized = Vec::new();
        if config.stages.binarize {
            binarized = self.timed(Stage::Binarizer, &mut timings, || {
                binarize(&mut df, &config.binarize_rules)
            })?;
        }

        let mut encoders = Vec::new();
        let mut chi_square = Vec::new();
        if config.stages.feature_selection {
            let (target, encoded) = self.timed(Stage::Encoder, &mut timings, || {
                let target = encode_column(&df, &config.target)?;
                let encoded = config
                    .selection_features
                    .iter()
                    .map(|name| encode_column(&df, name))
                    .collect::<Result<Vec<_>>>()?;
                Ok((target, encoded))
            })?;

            chi_square = self.timed(Stage::FeatureSelector, &mut timings, || {
                let target_codes: Vec<i64> = target.codes.iter().map(|&c| c as i64).collect();
                let features: Vec<EncodedFeature> = encoded
                    .iter()
                    .map(|e| EncodedFeature::from_codes(e.encoder.column.as_str(), &e.codes))
                    .collect();
                chi_square_scores(&features, &target_codes, &config.target)
            })?;

            encoders.push(target.encoder);
            encoders.extend(encoded.into_iter().map(|e| e.encoder));
        }

        let mut pca = None;
        if config.stages.pca || config.append_scaled_columns {
            let matrix = self.timed(Stage::Scaler, &mut timings, || {
                let matrix = standardize(&df, &config.pca_features)?;
                if config.append_scaled_columns {
                    append_scaled_columns(&mut df, &matrix)?;
                }
                Ok(matrix)
            })?;

            if config.stages.pca {
                let result = self.timed(Stage::DimensionalityReducer, &mut timings, || {
                    let result = fit_pca(&matrix, config.n_components)?;
                    if config.append_components {
                        append_components(&mut df, &matrix, &result)?;
                    }
                    Ok(result)
                })?;
                pca = Some(result);
            }
        }

        let skewness = self.timed(Stage::Skewness, &mut timings, || {
            skewness_report(&df, &config.pca_features)
        })?;

        let mut outliers = None;
        if config.stages.outlier_filter {
            let (filtered, summary) = self.timed(Stage::OutlierFilter, &mut timings, || {
                filter_outliers(df, &config.outliers)
            })?;
            df = filtered;
            outliers = Some(summary);
        }

        let report = RunReport {
            profile,
            imputation,
            duplicates_removed,
            features,
            bin_edges,
            binarized,
            encoders,
            pca,
            chi_square,
            outliers,
            skewness,
            final_rows: df.height(),
            final_columns: df.width(),
            timings,
        };

        Ok(PipelineOutput {
            dataset: df,
            report,
        })
    }
}
