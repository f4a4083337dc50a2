//! Label encoding of categorical columns
//!
//! Distinct values are sorted ascending and each value's code is its index in
//! that order, so the same set of values always produces the same codes.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::*;
use serde::Serialize;

use super::columns::required_string_column;
use super::error::{PipelineError, Result, Stage};

/// Sorted class list of one encoded column
#[derive(Debug, Clone, Serialize)]
pub struct LabelEncoder {
    pub column: String,
    pub classes: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, u32>,
}

impl LabelEncoder {
    /// Learn the sorted distinct values of `values`
    pub fn fit<'a, I>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        let classes: Vec<String> = distinct.into_iter().map(str::to_string).collect();

        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i as u32))
            .collect();

        Self {
            column: column.to_string(),
            classes,
            index,
        }
    }

    /// Code of a single value, if it was seen during `fit`
    pub fn code(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    /// Codes for `values`; an unseen value is an encoding error
    pub fn transform<'a, I>(&self, values: I) -> Result<Vec<u32>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        values
            .into_iter()
            .map(|v| {
                self.code(v).ok_or_else(|| {
                    PipelineError::encoding(
                        Stage::Encoder,
                        self.column.as_str(),
                        format!("value '{}' was not seen during fit", v),
                    )
                })
            })
            .collect()
    }
}

/// A column encoded for local use; never merged back into the dataset
#[derive(Debug, Clone)]
pub struct EncodedColumn {
    pub encoder: LabelEncoder,
    pub codes: Vec<u32>,
}

/// Fit and apply a label encoder to one column of `df`
pub fn encode_column(df: &DataFrame, name: &str) -> Result<EncodedColumn> {
    let values = required_string_column(df, name, Stage::Encoder)?;
    let encoder = LabelEncoder::fit(name, values.into_no_null_iter());
    let codes = encoder.transform(values.into_no_null_iter())?;
    Ok(EncodedColumn { encoder, codes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_sorted_order() {
        let values = ["UDP", "TCP", "ICMP", "TCP"];
        let encoder = LabelEncoder::fit("Protocol", values);
        assert_eq!(encoder.classes, vec!["ICMP", "TCP", "UDP"]);
        assert_eq!(encoder.transform(values).unwrap(), vec![2, 1, 0, 1]);
    }

    #[test]
    fn test_same_value_same_code() {
        let values = ["b", "a", "b", "c", "b"];
        let encoder = LabelEncoder::fit("x", values);
        let codes = encoder.transform(values).unwrap();
        assert_eq!(codes[0], codes[2]);
        assert_eq!(codes[2], codes[4]);
    }

    #[test]
    fn test_unseen_value() {
        let encoder = LabelEncoder::fit("x", ["a"]);
        assert!(encoder.transform(["b"]).is_err());
    }

    #[test]
    fn test_encode_column_over_integers() {
        let df = df! { "Severity Level" => [3i64, 1, 3, 2] }.unwrap();
        let encoded = encode_column(&df, "Severity Level").unwrap();
        assert_eq!(encoded.encoder.classes, vec!["1", "2", "3"]);
        assert_eq!(encoded.codes, vec![2, 0, 2, 1]);
    }

    #[test]
    fn test_encode_column_rejects_null() {
        let df = df! { "Severity Level" => [Some("Low"), None] }.unwrap();
        let err = encode_column(&df, "Severity Level").unwrap_err();
        assert!(matches!(err, PipelineError::NullValue { .. }));
    }
}
