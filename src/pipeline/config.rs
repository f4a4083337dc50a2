//! Pipeline configuration
//!
//! A single [`PipelineConfig`] enumerates which stages run and with which
//! parameters. `Default` yields the canonical run over the network-event
//! schema; a JSON file may override any subset of fields.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::error::{PipelineError, Result};
use super::schema::*;

/// What to do with rows whose payload is empty (length 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "value")]
pub enum EmptyPayloadPolicy {
    /// Abort with a computation error
    Fail,
    /// Drop the rows before packet efficiency is computed
    DropRows,
    /// Use a fixed efficiency value for those rows
    Sentinel(f64),
}

impl Default for EmptyPayloadPolicy {
    fn default() -> Self {
        EmptyPayloadPolicy::Fail
    }
}

impl std::str::FromStr for EmptyPayloadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(EmptyPayloadPolicy::Fail),
            "drop" | "drop_rows" | "drop-rows" => Ok(EmptyPayloadPolicy::DropRows),
            other => match other.strip_prefix("sentinel:") {
                Some(v) => v
                    .parse::<f64>()
                    .map(EmptyPayloadPolicy::Sentinel)
                    .map_err(|_| format!("'{}' is not a valid sentinel number", v)),
                None => Err(format!(
                    "Unknown empty-payload policy: '{}'. Use 'fail', 'drop' or 'sentinel:<value>'.",
                    s
                )),
            },
        }
    }
}

/// Where a binarization threshold comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "value")]
pub enum ThresholdPolicy {
    /// The column's own mean, computed at run time
    Mean,
    /// A fixed domain constant
    Fixed(f64),
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy::Mean
    }
}

/// One binarization rule producing a `<column> Bin` flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BinarizeRule {
    /// 1 where the numeric value is strictly greater than the threshold
    Threshold {
        column: String,
        #[serde(default)]
        threshold: ThresholdPolicy,
    },
    /// 1 where the categorical value equals `value`
    Equals { column: String, value: String },
}

impl BinarizeRule {
    pub fn column(&self) -> &str {
        match self {
            BinarizeRule::Threshold { column, .. } | BinarizeRule::Equals { column, .. } => column,
        }
    }
}

/// Equal-width binning of one numeric column; the bin count is the label count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualWidthRule {
    pub column: String,
    pub labels: Vec<String>,
}

/// Labels for the three fixed port bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortBandLabels {
    pub system: String,
    pub user: String,
    pub dynamic: String,
}

/// Port column together with the labels of its bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortRule {
    pub column: String,
    pub labels: PortBandLabels,
}

/// Which side of the z-score distribution counts as an outlier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierTail {
    /// |z| > threshold
    #[default]
    Both,
    /// z > threshold (signed comparison, only high extremes)
    Upper,
}

impl std::fmt::Display for OutlierTail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutlierTail::Both => write!(f, "both"),
            OutlierTail::Upper => write!(f, "upper"),
        }
    }
}

impl std::str::FromStr for OutlierTail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "both" | "abs" => Ok(OutlierTail::Both),
            "upper" => Ok(OutlierTail::Upper),
            _ => Err(format!("Unknown outlier tail: '{}'. Use 'both' or 'upper'.", s)),
        }
    }
}

/// Mode/sentinel imputation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputationConfig {
    /// Columns whose nulls are replaced by the column mode
    pub mode_columns: Vec<String>,
    /// Column whose nulls are replaced by `sentinel_label`
    pub sentinel_column: Option<String>,
    pub sentinel_label: String,
}

impl Default for ImputationConfig {
    fn default() -> Self {
        Self {
            mode_columns: vec![
                MALWARE_INDICATORS.to_string(),
                ALERTS_WARNINGS.to_string(),
                FIREWALL_LOGS.to_string(),
                IDS_IPS_ALERTS.to_string(),
            ],
            sentinel_column: Some(PROXY_INFORMATION.to_string()),
            sentinel_label: NO_PROXY_SENTINEL.to_string(),
        }
    }
}

/// Outlier filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierConfig {
    pub columns: Vec<String>,
    pub threshold: f64,
    pub tail: OutlierTail,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            columns: vec![PAYLOAD_LENGTH.to_string(), PACKET_EFFICIENCY.to_string()],
            threshold: 2.0,
            tail: OutlierTail::Both,
        }
    }
}

/// Stage toggles; loading, cleaning, feature engineering and export always run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageToggles {
    pub discretize: bool,
    pub ip_classes: bool,
    pub binarize: bool,
    pub feature_selection: bool,
    pub pca: bool,
    pub outlier_filter: bool,
}

impl Default for StageToggles {
    fn default() -> Self {
        Self {
            discretize: true,
            ip_classes: true,
            binarize: true,
            feature_selection: true,
            pca: true,
            outlier_filter: true,
        }
    }
}

/// Complete configuration of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target column scored against by the feature selector
    pub target: String,
    pub stages: StageToggles,
    pub imputation: ImputationConfig,
    /// Remove exact duplicate rows (first occurrence kept)
    pub drop_duplicates: bool,
    pub empty_payload: EmptyPayloadPolicy,
    pub port_rules: Vec<PortRule>,
    pub equal_width_rules: Vec<EqualWidthRule>,
    pub ip_columns: Vec<(String, String)>,
    pub binarize_rules: Vec<BinarizeRule>,
    /// Categorical features encoded and scored against the target
    pub selection_features: Vec<String>,
    /// Numeric features standardized and projected by PCA
    pub pca_features: Vec<String>,
    pub n_components: usize,
    /// Append `<column> Scaled` columns to the exported dataset
    pub append_scaled_columns: bool,
    /// Append `PC1..PCn` projected scores to the exported dataset
    pub append_components: bool,
    pub outliers: OutlierConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target: ATTACK_TYPE.to_string(),
            stages: StageToggles::default(),
            imputation: ImputationConfig::default(),
            drop_duplicates: false,
            empty_payload: EmptyPayloadPolicy::Fail,
            port_rules: vec![
                PortRule {
                    column: SOURCE_PORT.to_string(),
                    labels: PortBandLabels {
                        system: "System".to_string(),
                        user: "User".to_string(),
                        dynamic: "Dynamic/Private".to_string(),
                    },
                },
                PortRule {
                    column: DESTINATION_PORT.to_string(),
                    labels: PortBandLabels {
                        system: "System".to_string(),
                        user: "Registered".to_string(),
                        dynamic: "Dynamic/Private".to_string(),
                    },
                },
            ],
            equal_width_rules: vec![
                EqualWidthRule {
                    column: PACKET_LENGTH.to_string(),
                    labels: vec!["Small".into(), "Medium".into(), "Large".into()],
                },
                EqualWidthRule {
                    column: ANOMALY_SCORES.to_string(),
                    labels: vec!["Normal".into(), "Suspicious".into(), "Critical".into()],
                },
            ],
            ip_columns: vec![
                (SOURCE_IP.to_string(), SOURCE_IP_CLASS.to_string()),
                (DESTINATION_IP.to_string(), DESTINATION_IP_CLASS.to_string()),
            ],
            binarize_rules: vec![
                BinarizeRule::Equals {
                    column: PACKET_TYPE.to_string(),
                    value: "Control".to_string(),
                },
                BinarizeRule::Equals {
                    column: LOG_SOURCE.to_string(),
                    value: "Firewall".to_string(),
                },
                BinarizeRule::Threshold {
                    column: ANOMALY_SCORES.to_string(),
                    threshold: ThresholdPolicy::Mean,
                },
            ],
            selection_features: vec![
                ACTION_TAKEN.to_string(),
                SEVERITY_LEVEL.to_string(),
                TRAFFIC_TYPE.to_string(),
                PROTOCOL.to_string(),
                ATTACK_SIGNATURE.to_string(),
                GEO_LOCATION.to_string(),
                DEVICE_INFORMATION.to_string(),
            ],
            pca_features: vec![
                SOURCE_PORT.to_string(),
                DESTINATION_PORT.to_string(),
                PACKET_LENGTH.to_string(),
                PAYLOAD_LENGTH.to_string(),
                PACKET_EFFICIENCY.to_string(),
                ANOMALY_SCORES.to_string(),
            ],
            n_components: 2,
            append_scaled_columns: false,
            append_components: false,
            outliers: OutlierConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; absent fields take defaults
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_outlier_threshold(mut self, threshold: f64) -> Self {
        self.outliers.threshold = threshold;
        self
    }

    pub fn with_outlier_tail(mut self, tail: OutlierTail) -> Self {
        self.outliers.tail = tail;
        self
    }

    pub fn with_outlier_filter(mut self, enabled: bool) -> Self {
        self.stages.outlier_filter = enabled;
        self
    }

    pub fn with_empty_payload(mut self, policy: EmptyPayloadPolicy) -> Self {
        self.empty_payload = policy;
        self
    }

    pub fn with_drop_duplicates(mut self, enabled: bool) -> Self {
        self.drop_duplicates = enabled;
        self
    }

    pub fn with_appended_scaled_columns(mut self, enabled: bool) -> Self {
        self.append_scaled_columns = enabled;
        self
    }

    pub fn with_appended_components(mut self, enabled: bool) -> Self {
        self.append_components = enabled;
        self
    }

    /// Check parameter ranges before any stage runs
    pub fn validate(&self) -> Result<()> {
        if self.target.is_empty() {
            return Err(PipelineError::configuration("target column name is empty"));
        }

        for rule in &self.equal_width_rules {
            if rule.labels.is_empty() {
                return Err(PipelineError::configuration(format!(
                    "equal-width binning of '{}' needs at least one label",
                    rule.column
                )));
            }
        }

        for rule in &self.binarize_rules {
            if let BinarizeRule::Threshold {
                column,
                threshold: ThresholdPolicy::Fixed(t),
            } = rule
            {
                if !t.is_finite() {
                    return Err(PipelineError::configuration(format!(
                        "fixed binarization threshold for '{}' must be finite, got {}",
                        column, t
                    )));
                }
            }
        }

        if let EmptyPayloadPolicy::Sentinel(v) = self.empty_payload {
            if !v.is_finite() {
                return Err(PipelineError::configuration(format!(
                    "empty-payload sentinel must be finite, got {}",
                    v
                )));
            }
        }

        if self.stages.pca {
            if self.pca_features.is_empty() {
                return Err(PipelineError::configuration("PCA needs at least one feature"));
            }
            if self.n_components == 0 || self.n_components > self.pca_features.len() {
                return Err(PipelineError::configuration(format!(
                    "n_components must be between 1 and {}, got {}",
                    self.pca_features.len(),
                    self.n_components
                )));
            }
        }

        if self.stages.outlier_filter {
            validate_outlier_threshold(self.outliers.threshold)?;
            if self.outliers.columns.is_empty() {
                return Err(PipelineError::configuration(
                    "outlier filter needs at least one monitored column",
                ));
            }
        }

        Ok(())
    }

    /// Source columns the enabled stages read; derived columns are excluded
    pub fn required_columns(&self) -> Vec<String> {
        let derived = [PAYLOAD_LENGTH, PACKET_EFFICIENCY];
        let mut columns: Vec<String> = vec![PAYLOAD_DATA.to_string(), PACKET_LENGTH.to_string()];

        columns.extend(self.imputation.mode_columns.iter().cloned());
        columns.extend(self.imputation.sentinel_column.iter().cloned());

        if self.stages.discretize {
            columns.extend(self.port_rules.iter().map(|r| r.column.clone()));
            columns.extend(self.equal_width_rules.iter().map(|r| r.column.clone()));
        }
        if self.stages.ip_classes {
            columns.extend(self.ip_columns.iter().map(|(src, _)| src.clone()));
        }
        if self.stages.binarize {
            columns.extend(self.binarize_rules.iter().map(|r| r.column().to_string()));
        }
        if self.stages.feature_selection {
            columns.push(self.target.clone());
            columns.extend(self.selection_features.iter().cloned());
        }
        // The PCA features are also the columns the skewness report covers
        columns.extend(self.pca_features.iter().cloned());
        if self.stages.outlier_filter {
            columns.extend(self.outliers.columns.iter().cloned());
        }

        let mut unique = Vec::with_capacity(columns.len());
        for column in columns {
            if !derived.contains(&column.as_str()) && !unique.contains(&column) {
                unique.push(column);
            }
        }
        unique
    }
}

/// A z-score threshold must be finite and positive
pub fn validate_outlier_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(PipelineError::configuration(format!(
            "outlier threshold must be a positive number, got {}",
            threshold
        )));
    }
    Ok(())
}
