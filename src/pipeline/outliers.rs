//! Z-score outlier filtering on raw (unscaled) columns

use polars::prelude::*;
use serde::Serialize;

use super::columns::f64_values;
use super::config::{validate_outlier_threshold, OutlierConfig, OutlierTail};
use super::error::{Result, Stage};
use super::stats::{mean, population_std};

/// Rows flagged in one monitored column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnOutliers {
    pub column: String,
    pub flagged: usize,
}

/// Result of the outlier filter, for the run report
#[derive(Debug, Clone, Serialize)]
pub struct OutlierSummary {
    pub threshold: f64,
    pub tail: OutlierTail,
    pub rows_examined: usize,
    pub rows_removed: usize,
    pub per_column: Vec<ColumnOutliers>,
}

/// Flag each value whose z-score exceeds `threshold`.
/// A zero-variance column never flags.
pub fn outlier_mask(values: &[f64], threshold: f64, tail: OutlierTail) -> Vec<bool> {
    let Some(m) = mean(values) else {
        return vec![false; values.len()];
    };
    let std = population_std(values, m);
    if std == 0.0 || !std.is_finite() {
        return vec![false; values.len()];
    }

    values
        .iter()
        .map(|v| {
            let z = (v - m) / std;
            match tail {
                OutlierTail::Both => z.abs() > threshold,
                OutlierTail::Upper => z > threshold,
            }
        })
        .collect()
}

/// Drop every row flagged in any monitored column
pub fn filter_outliers(df: DataFrame, config: &OutlierConfig) -> Result<(DataFrame, OutlierSummary)> {
    validate_outlier_threshold(config.threshold)?;

    let rows_examined = df.height();
    let mut flagged = vec![false; rows_examined];
    let mut per_column = Vec::with_capacity(config.columns.len());

    for column in &config.columns {
        let values = f64_values(&df, column, Stage::OutlierFilter)?;
        let mask = outlier_mask(&values, config.threshold, config.tail);
        per_column.push(ColumnOutliers {
            column: column.clone(),
            flagged: mask.iter().filter(|&&f| f).count(),
        });
        for (row, hit) in flagged.iter_mut().zip(mask) {
            *row |= hit;
        }
    }

    let keep: BooleanChunked = flagged.iter().map(|&f| !f).collect();
    let filtered = df.filter(&keep)?;

    let summary = OutlierSummary {
        threshold: config.threshold,
        tail: config.tail,
        rows_examined,
        rows_removed: rows_examined - filtered.height(),
        per_column,
    };
    Ok((filtered, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::error::PipelineError;

    fn spread() -> Vec<f64> {
        // mean 0 with two symmetric extremes at |z| ~ 7
        let mut v = vec![0.0; 98];
        v.push(7.0);
        v.push(-7.0);
        v
    }

    #[test]
    fn test_both_tails_flag_low_extreme() {
        let values = spread();
        let both = outlier_mask(&values, 2.0, OutlierTail::Both);
        let upper = outlier_mask(&values, 2.0, OutlierTail::Upper);

        assert!(both[98] && both[99]);
        assert!(upper[98]);
        assert!(!upper[99], "signed comparison ignores low extremes");
    }

    #[test]
    fn test_zero_variance_never_flags() {
        let mask = outlier_mask(&[5.0; 10], 0.1, OutlierTail::Both);
        assert!(mask.iter().all(|&f| !f));
    }

    #[test]
    fn test_filter_removes_flagged_rows_in_order() {
        let values = spread();
        let ids: Vec<i64> = (0..values.len() as i64).collect();
        let df = df! { "id" => ids, "x" => values }.unwrap();

        let config = OutlierConfig {
            columns: vec!["x".into()],
            threshold: 2.0,
            tail: OutlierTail::Both,
        };
        let (filtered, summary) = filter_outliers(df, &config).unwrap();
        assert_eq!(filtered.height(), 98);
        assert_eq!(summary.rows_removed, 2);
        assert_eq!(summary.per_column[0].flagged, 2);

        let ids: Vec<i64> = filtered.column("id").unwrap().i64().unwrap().into_no_null_iter().collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_invalid_threshold() {
        let df = df! { "x" => [1.0f64, 2.0] }.unwrap();
        let config = OutlierConfig {
            columns: vec!["x".into()],
            threshold: -1.0,
            tail: OutlierTail::Both,
        };
        assert!(matches!(
            filter_outliers(df, &config),
            Err(PipelineError::Configuration(_))
        ));
    }
}
