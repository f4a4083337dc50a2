//! Dataset profiling: dtypes, missing counts, numeric summaries, target counts

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::cleaner::count_duplicates;
use super::columns::{numeric_column_names, require_column, string_column};
use super::error::{Result, Stage};
use super::stats::{mean, sample_std, skewness};

/// Name and data type of one column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnType {
    pub column: String,
    pub dtype: String,
}

/// Summary statistics of one numeric column, over its non-null values
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Skewness of one numeric column; absent for zero variance
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSkew {
    pub column: String,
    pub skewness: Option<f64>,
}

/// Profile of a dataset as loaded
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub dtypes: Vec<ColumnType>,
    /// Null count per column, in dataset order
    pub missing: Vec<(String, usize)>,
    pub duplicate_rows: usize,
    pub numeric: Vec<NumericSummary>,
    /// Category counts of the target, most frequent first
    pub target_counts: Vec<(String, usize)>,
}

impl DatasetProfile {
    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|(_, n)| n).sum()
    }
}

/// Null count per column, in dataset order
pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect()
}

fn non_null_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().flatten().collect())
}

/// count/mean/std/min/max of every numeric column; std is the sample std
pub fn numeric_summaries(df: &DataFrame) -> Result<Vec<NumericSummary>> {
    numeric_column_names(df)
        .into_iter()
        .map(|name| {
            let values = non_null_f64(df, &name)?;
            let m = mean(&values);
            let min = values.iter().copied().reduce(f64::min);
            let max = values.iter().copied().reduce(f64::max);
            Ok(NumericSummary {
                count: values.len(),
                mean: m,
                std: m.filter(|_| values.len() > 1).map(|m| sample_std(&values, m)),
                min,
                max,
                column: name,
            })
        })
        .collect()
}

/// Occurrences of each target value, most frequent first, ties by value
pub fn target_counts(df: &DataFrame, target: &str) -> Result<Vec<(String, usize)>> {
    let values = string_column(df, target, Stage::Profiler)?;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.iter() {
        *counts.entry(value.unwrap_or("<null>")).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, n)| (value.to_string(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(counts)
}

/// Skewness of each of `columns`, over their non-null values
pub fn skewness_report(df: &DataFrame, columns: &[String]) -> Result<Vec<ColumnSkew>> {
    columns
        .iter()
        .map(|name| {
            require_column(df, name, Stage::Skewness)?;
            let values = non_null_f64(df, name)?;
            Ok(ColumnSkew {
                column: name.clone(),
                skewness: skewness(&values),
            })
        })
        .collect()
}

/// Profile `df`; target counts are skipped when the target is absent
pub fn profile_dataset(df: &DataFrame, target: &str) -> Result<DatasetProfile> {
    let dtypes = df
        .get_columns()
        .iter()
        .map(|col| ColumnType {
            column: col.name().to_string(),
            dtype: col.dtype().to_string(),
        })
        .collect();

    let target_counts = if df.column(target).is_ok() {
        target_counts(df, target)?
    } else {
        eprintln!("Warning: target column '{}' not found, skipping target counts", target);
        Vec::new()
    };

    Ok(DatasetProfile {
        rows: df.height(),
        columns: df.width(),
        dtypes,
        missing: missing_counts(df),
        duplicate_rows: count_duplicates(df)?,
        numeric: numeric_summaries(df)?,
        target_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "Attack Type" => ["DDoS", "Malware", "DDoS", "Intrusion", "DDoS"],
            "Packet Length" => [Some(100i64), Some(200), None, Some(300), Some(100)],
            "Alerts/Warnings" => [Some("Alert Triggered"), None, None, Some("Alert Triggered"), None],
        }
        .unwrap()
    }

    #[test]
    fn test_missing_counts() {
        let missing = missing_counts(&sample());
        assert_eq!(missing[0], ("Attack Type".to_string(), 0));
        assert_eq!(missing[1], ("Packet Length".to_string(), 1));
        assert_eq!(missing[2], ("Alerts/Warnings".to_string(), 3));
    }

    #[test]
    fn test_numeric_summary_skips_nulls() {
        let summaries = numeric_summaries(&sample()).unwrap();
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, Some(175.0));
        assert_eq!(s.min, Some(100.0));
        assert_eq!(s.max, Some(300.0));
    }

    #[test]
    fn test_target_counts_ordering() {
        let counts = target_counts(&sample(), "Attack Type").unwrap();
        assert_eq!(counts[0], ("DDoS".to_string(), 3));
        // Ties ordered by value
        assert_eq!(counts[1].0, "Intrusion");
        assert_eq!(counts[2].0, "Malware");
    }

    #[test]
    fn test_profile_counts_duplicates() {
        let df = df! { "a" => [1i64, 1, 2], "b" => ["x", "x", "y"] }.unwrap();
        let profile = profile_dataset(&df, "b").unwrap();
        assert_eq!(profile.duplicate_rows, 1);
        assert_eq!(profile.rows, 3);
        assert_eq!(profile.columns, 2);
        assert_eq!(profile.total_missing(), 0);
    }

    #[test]
    fn test_skewness_report() {
        let df = df! { "x" => [1.0f64, 1.0, 1.0, 10.0], "c" => [2.0f64, 2.0, 2.0, 2.0] }.unwrap();
        let columns = vec!["x".to_string(), "c".to_string()];
        let skews = skewness_report(&df, &columns).unwrap();
        assert_eq!(skews.len(), 2);
        assert!(skews[0].skewness.unwrap() > 0.0);
        assert!(skews[1].skewness.is_none());
    }

    #[test]
    fn test_skewness_report_limited_to_requested_columns() {
        let df = df! {
            "x" => [1.0f64, 1.0, 1.0, 10.0],
            "x Bin" => [0i32, 0, 0, 1],
        }
        .unwrap();
        let skews = skewness_report(&df, &["x".to_string()]).unwrap();
        assert_eq!(skews.len(), 1);
        assert_eq!(skews[0].column, "x");

        assert!(matches!(
            skewness_report(&df, &["missing".to_string()]),
            Err(crate::pipeline::error::PipelineError::SchemaValidation {
                stage: Stage::Skewness,
                ..
            })
        ));
    }
}
