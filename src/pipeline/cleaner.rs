//! Missing-value imputation and duplicate handling
//!
//! Mode-imputed columns take their most frequent non-null value; ties go to
//! the smallest value in ascending byte order. The sentinel column is filled
//! with a fixed label instead. Duplicates are only counted here unless the
//! caller opts into dropping them.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::columns::{require_column, string_column};
use super::config::ImputationConfig;
use super::error::{PipelineError, Result, Stage};

/// How a column's nulls were filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputationStrategy {
    Mode,
    Sentinel,
}

/// One column's imputation outcome, for the run report
#[derive(Debug, Clone, Serialize)]
pub struct ImputationRecord {
    pub column: String,
    pub strategy: ImputationStrategy,
    pub fill_value: String,
    pub filled: usize,
}

/// Most frequent non-null value; ties resolved to the smallest value.
/// Returns `None` when every value is null.
pub fn column_mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    // BTreeMap iterates in ascending key order, so the first maximum wins ties
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values.into_iter().flatten() {
        *counts.entry(v).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(v, _)| v.to_string())
}

/// Replace nulls in one column with `fill`, returning the number filled
fn fill_column(df: &mut DataFrame, name: &str, fill: &str) -> Result<usize> {
    let values = string_column(df, name, Stage::Cleaner)?;
    let filled = values.null_count();
    if filled == 0 {
        return Ok(0);
    }

    let replaced = values.set(&values.is_null(), Some(fill))?;
    df.with_column(Column::from(replaced.into_series()))?;
    Ok(filled)
}

/// Impute the designated nullable columns in place
///
/// # Errors
/// * `SchemaValidation` if a designated column is absent
/// * `NullValue` if a mode-imputed column has no non-null value to take the mode of
pub fn impute_missing(
    df: &mut DataFrame,
    config: &ImputationConfig,
) -> Result<Vec<ImputationRecord>> {
    let mut records = Vec::new();

    for name in &config.mode_columns {
        let values = string_column(df, name, Stage::Cleaner)?;
        let mode = column_mode(values.iter())
            .ok_or_else(|| PipelineError::null_value(Stage::Cleaner, name.as_str(), None))?;

        let filled = fill_column(df, name, &mode)?;
        records.push(ImputationRecord {
            column: name.clone(),
            strategy: ImputationStrategy::Mode,
            fill_value: mode,
            filled,
        });
    }

    if let Some(name) = &config.sentinel_column {
        require_column(df, name, Stage::Cleaner)?;
        let filled = fill_column(df, name, &config.sentinel_label)?;
        records.push(ImputationRecord {
            column: name.clone(),
            strategy: ImputationStrategy::Sentinel,
            fill_value: config.sentinel_label.clone(),
            filled,
        });
    }

    Ok(records)
}

/// Number of rows that exactly repeat an earlier row
pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
    let unique = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    Ok(df.height() - unique.height())
}

/// Remove exact duplicate rows, keeping the first occurrence and row order
pub fn drop_duplicates(df: DataFrame) -> Result<DataFrame> {
    Ok(df
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_picks_most_frequent() {
        let values = [Some("b"), Some("a"), Some("b"), None, Some("c")];
        assert_eq!(column_mode(values), Some("b".to_string()));
    }

    #[test]
    fn test_mode_tie_goes_to_smallest() {
        let values = [Some("zeta"), Some("alpha"), Some("zeta"), Some("alpha")];
        assert_eq!(column_mode(values), Some("alpha".to_string()));
    }

    #[test]
    fn test_mode_all_null() {
        let values: [Option<&str>; 2] = [None, None];
        assert_eq!(column_mode(values), None);
    }

    #[test]
    fn test_fill_keeps_existing_values_and_order() {
        let mut df = df! {
            "Firewall Logs" => [None, Some("Log Data"), None, Some("Other")],
        }
        .unwrap();

        let filled = fill_column(&mut df, "Firewall Logs", "Log Data").unwrap();
        assert_eq!(filled, 2);

        let values: Vec<&str> = df
            .column("Firewall Logs")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(values, vec!["Log Data", "Log Data", "Log Data", "Other"]);
    }

    #[test]
    fn test_duplicates_counted_not_dropped() {
        let df = df! {
            "a" => [1i64, 1, 2, 1],
            "b" => ["x", "x", "y", "x"],
        }
        .unwrap();

        assert_eq!(count_duplicates(&df).unwrap(), 2);
        assert_eq!(df.height(), 4);

        let deduped = drop_duplicates(df).unwrap();
        assert_eq!(deduped.height(), 2);
        let first: Vec<Option<i64>> = deduped.column("a").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(first, vec![Some(1), Some(2)], "row order must be preserved");
    }
}
