//! Binarization of columns into 0/1 flags

use polars::prelude::*;
use serde::Serialize;

use super::columns::{f64_values, string_column};
use super::config::{BinarizeRule, ThresholdPolicy};
use super::error::{PipelineError, Result, Stage};
use super::schema::{derived_name, BIN_SUFFIX};
use super::stats::mean;

/// Threshold or match value applied by one rule, for the run report
#[derive(Debug, Clone, Serialize)]
pub struct BinarizeOutcome {
    pub column: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,
    pub ones: usize,
}

/// 1 where the value is strictly greater than `threshold`
pub fn binarize_values(values: &[f64], threshold: f64) -> Vec<i32> {
    values.iter().map(|&v| i32::from(v > threshold)).collect()
}

/// Resolve the threshold a rule compares against
pub fn resolve_threshold(values: &[f64], policy: ThresholdPolicy, column: &str) -> Result<f64> {
    match policy {
        ThresholdPolicy::Fixed(t) if t.is_finite() => Ok(t),
        ThresholdPolicy::Fixed(t) => Err(PipelineError::configuration(format!(
            "fixed binarization threshold for '{}' must be finite, got {}",
            column, t
        ))),
        ThresholdPolicy::Mean => mean(values).ok_or_else(|| {
            PipelineError::computation(
                Stage::Binarizer,
                column,
                None,
                "mean threshold is undefined for an empty or non-finite column",
            )
        }),
    }
}

/// Apply every rule, adding one `<column> Bin` flag column per rule
pub fn binarize(df: &mut DataFrame, rules: &[BinarizeRule]) -> Result<Vec<BinarizeOutcome>> {
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let output = derived_name(rule.column(), BIN_SUFFIX);

        let (flags, threshold, matches) = match rule {
            BinarizeRule::Threshold { column, threshold } => {
                let values = f64_values(df, column, Stage::Binarizer)?;
                let t = resolve_threshold(&values, *threshold, column)?;
                (binarize_values(&values, t), Some(t), None)
            }
            BinarizeRule::Equals { column, value } => {
                // A null value never matches
                let flags: Vec<i32> = string_column(df, column, Stage::Binarizer)?
                    .equal(value.as_str())
                    .iter()
                    .map(|hit| i32::from(hit == Some(true)))
                    .collect();
                (flags, None, Some(value.clone()))
            }
        };

        let ones = flags.iter().filter(|&&f| f == 1).count();
        df.with_column(Column::new(output.as_str().into(), flags))?;

        outcomes.push(BinarizeOutcome {
            column: rule.column().to_string(),
            output,
            threshold,
            matches,
            ones,
        });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strictly_greater() {
        assert_eq!(binarize_values(&[1.0, 2.0, 3.0], 2.0), vec![0, 0, 1]);
    }

    #[test]
    fn test_mean_threshold_default() {
        let mut df = df! { "Anomaly Scores" => [10.0f64, 20.0, 30.0, 40.0] }.unwrap();
        let rules = vec![BinarizeRule::Threshold {
            column: "Anomaly Scores".into(),
            threshold: ThresholdPolicy::default(),
        }];

        let outcomes = binarize(&mut df, &rules).unwrap();
        assert_eq!(outcomes[0].threshold, Some(25.0));

        let flags: Vec<i32> = df
            .column("Anomaly Scores Bin")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(flags, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_fixed_port_threshold() {
        let mut df = df! { "Destination Port" => [22i64, 1023, 1024, 8080] }.unwrap();
        let rules = vec![BinarizeRule::Threshold {
            column: "Destination Port".into(),
            threshold: ThresholdPolicy::Fixed(1023.0),
        }];

        binarize(&mut df, &rules).unwrap();
        let flags: Vec<i32> = df
            .column("Destination Port Bin")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(flags, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_equals_rule_treats_null_as_zero() {
        let mut df = df! { "Packet Type" => [Some("Control"), Some("Data"), None] }.unwrap();
        let rules = vec![BinarizeRule::Equals {
            column: "Packet Type".into(),
            value: "Control".into(),
        }];

        let outcomes = binarize(&mut df, &rules).unwrap();
        assert_eq!(outcomes[0].ones, 1);
        let flags: Vec<i32> = df
            .column("Packet Type Bin")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(flags, vec![1, 0, 0]);
    }

    #[test]
    fn test_non_finite_fixed_threshold() {
        let err = resolve_threshold(&[1.0], ThresholdPolicy::Fixed(f64::INFINITY), "x").unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }
}
