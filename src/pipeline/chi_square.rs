//! Univariate chi-square scoring of encoded features against the target
//!
//! For every feature the observed table is the per-class sum of the feature's
//! values and the expected table is the class frequency times the feature's
//! total, giving `sum((observed - expected)^2 / expected)` over classes.

use serde::Serialize;

use super::error::{PipelineError, Result, Stage};
use super::stats::chi_square_sf;

/// Non-negative encoded values of one feature
#[derive(Debug, Clone)]
pub struct EncodedFeature {
    pub name: String,
    pub values: Vec<f64>,
}

impl EncodedFeature {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn from_codes(name: impl Into<String>, codes: &[u32]) -> Self {
        Self::new(name, codes.iter().map(|&c| c as f64).collect())
    }
}

/// Chi-square result for one feature
#[derive(Debug, Clone, Serialize)]
pub struct ChiSquareScore {
    pub feature: String,
    pub statistic: f64,
    /// Absent when the target has a single class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    pub degrees_of_freedom: usize,
}

/// Score each feature independently against `target`
///
/// # Errors
/// * `Encoding` if a feature or the target holds a negative or non-finite value
/// * `Configuration` if lengths differ
pub fn chi_square_scores(
    features: &[EncodedFeature],
    target: &[i64],
    target_name: &str,
) -> Result<Vec<ChiSquareScore>> {
    if let Some(code) = target.iter().find(|&&c| c < 0) {
        return Err(PipelineError::encoding(
            Stage::FeatureSelector,
            target_name,
            format!("negative target code {}", code),
        ));
    }

    let mut classes: Vec<i64> = target.to_vec();
    classes.sort_unstable();
    classes.dedup();
    let class_of = |code: i64| classes.binary_search(&code).unwrap_or(0);

    let n = target.len() as f64;
    let mut class_counts = vec![0.0; classes.len()];
    for &code in target {
        class_counts[class_of(code)] += 1.0;
    }
    let degrees_of_freedom = classes.len().saturating_sub(1);

    features
        .iter()
        .map(|feature| {
            if feature.values.len() != target.len() {
                return Err(PipelineError::configuration(format!(
                    "feature '{}' has {} values but target '{}' has {}",
                    feature.name,
                    feature.values.len(),
                    target_name,
                    target.len()
                )));
            }
            if let Some(bad) = feature.values.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(PipelineError::encoding(
                    Stage::FeatureSelector,
                    feature.name.as_str(),
                    format!("value {} is negative or non-finite", bad),
                ));
            }

            let mut observed = vec![0.0; classes.len()];
            for (&v, &code) in feature.values.iter().zip(target) {
                observed[class_of(code)] += v;
            }
            let total: f64 = observed.iter().sum();

            let statistic: f64 = observed
                .iter()
                .zip(&class_counts)
                .map(|(&obs, &count)| {
                    let expected = count / n * total;
                    if expected > 0.0 {
                        (obs - expected).powi(2) / expected
                    } else {
                        0.0
                    }
                })
                .sum();

            let p_value =
                (degrees_of_freedom > 0).then(|| chi_square_sf(statistic, degrees_of_freedom as f64));

            Ok(ChiSquareScore {
                feature: feature.name.clone(),
                statistic,
                p_value,
                degrees_of_freedom,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_feature_scores_zero() {
        // Same distribution of feature values within each class
        let target = [0, 0, 1, 1];
        let feature = EncodedFeature::new("f", vec![1.0, 2.0, 1.0, 2.0]);
        let scores = chi_square_scores(&[feature], &target, "t").unwrap();
        assert!(scores[0].statistic.abs() < 1e-12);
        assert!((scores[0].p_value.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_statistic() {
        // observed = [0, 4]; expected = [2, 2] -> (4/2) + (4/2) = 4
        let target = [0, 0, 1, 1];
        let feature = EncodedFeature::new("f", vec![0.0, 0.0, 2.0, 2.0]);
        let scores = chi_square_scores(&[feature], &target, "t").unwrap();
        assert!((scores[0].statistic - 4.0).abs() < 1e-12);
        assert_eq!(scores[0].degrees_of_freedom, 1);
        let p = scores[0].p_value.unwrap();
        assert!(p > 0.04 && p < 0.05, "p = {}", p);
    }

    #[test]
    fn test_negative_code_rejected() {
        let feature = EncodedFeature::new("f", vec![1.0, -1.0]);
        let err = chi_square_scores(&[feature], &[0, 1], "t").unwrap_err();
        assert!(matches!(err, PipelineError::Encoding { .. }));

        let feature = EncodedFeature::new("f", vec![1.0, 1.0]);
        let err = chi_square_scores(&[feature], &[0, -3], "t").unwrap_err();
        assert!(matches!(err, PipelineError::Encoding { .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        let feature = EncodedFeature::new("f", vec![1.0, f64::NAN]);
        let err = chi_square_scores(&[feature], &[0, 1], "t").unwrap_err();
        assert!(matches!(err, PipelineError::Encoding { .. }));
    }

    #[test]
    fn test_single_class_has_no_p_value() {
        let feature = EncodedFeature::new("f", vec![1.0, 2.0]);
        let scores = chi_square_scores(&[feature], &[3, 3], "t").unwrap();
        assert_eq!(scores[0].degrees_of_freedom, 0);
        assert!(scores[0].p_value.is_none());
    }

    #[test]
    fn test_all_zero_feature_scores_zero() {
        let feature = EncodedFeature::new("f", vec![0.0, 0.0, 0.0]);
        let scores = chi_square_scores(&[feature], &[0, 1, 2], "t").unwrap();
        assert_eq!(scores[0].statistic, 0.0);
    }
}
