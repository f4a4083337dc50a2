//! Standardization of numeric columns to zero mean and unit variance

use faer::Mat;
use polars::prelude::*;

use super::columns::f64_values;
use super::error::{PipelineError, Result, Stage};
use super::schema::{derived_name, SCALED_SUFFIX};
use super::stats::{mean, population_std};

/// Mean and population standard deviation a column was standardized with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnScale {
    pub mean: f64,
    pub std: f64,
}

/// `(x - mean) / std`; a zero-variance column standardizes to all zeros
pub fn standardize_values(values: &[f64], column: &str) -> Result<(Vec<f64>, ColumnScale)> {
    if let Some(row) = values.iter().position(|v| !v.is_finite()) {
        return Err(PipelineError::computation(
            Stage::Scaler,
            column,
            Some(row),
            "non-finite input value",
        ));
    }

    let m = mean(values).ok_or_else(|| {
        PipelineError::computation(Stage::Scaler, column, None, "cannot standardize an empty column")
    })?;
    let std = population_std(values, m);

    let scaled = if std > 0.0 {
        values.iter().map(|v| (v - m) / std).collect()
    } else {
        vec![0.0; values.len()]
    };

    Ok((scaled, ColumnScale { mean: m, std }))
}

/// Standardized feature matrix (rows x features), independent of the dataframe
#[derive(Debug, Clone)]
pub struct StandardizedMatrix {
    pub columns: Vec<String>,
    pub scales: Vec<ColumnScale>,
    pub data: Mat<f64>,
}

impl StandardizedMatrix {
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// One standardized column as a vector
    pub fn column_values(&self, j: usize) -> Vec<f64> {
        (0..self.data.nrows()).map(|i| self.data[(i, j)]).collect()
    }
}

/// Standardize `features` of `df` into a dense matrix
pub fn standardize(df: &DataFrame, features: &[String]) -> Result<StandardizedMatrix> {
    let n_rows = df.height();
    let mut data = Mat::<f64>::zeros(n_rows, features.len());
    let mut scales = Vec::with_capacity(features.len());

    for (col_idx, name) in features.iter().enumerate() {
        let values = f64_values(df, name, Stage::Scaler)?;
        let (scaled, scale) = standardize_values(&values, name)?;
        for (row_idx, &v) in scaled.iter().enumerate() {
            data[(row_idx, col_idx)] = v;
        }
        scales.push(scale);
    }

    Ok(StandardizedMatrix {
        columns: features.to_vec(),
        scales,
        data,
    })
}

/// Append every matrix column to `df` as `<column> Scaled`
pub fn append_scaled_columns(df: &mut DataFrame, matrix: &StandardizedMatrix) -> Result<()> {
    for (j, name) in matrix.columns.iter().enumerate() {
        let output = derived_name(name, SCALED_SUFFIX);
        df.with_column(Column::new(output.as_str().into(), matrix.column_values(j)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_variance() {
        let (scaled, scale) = standardize_values(&[1.0, 2.0, 3.0, 4.0, 5.0], "x").unwrap();
        assert_eq!(scale.mean, 3.0);

        let m = mean(&scaled).unwrap();
        assert!(m.abs() < 1e-12);
        assert!((population_std(&scaled, m) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_zero() {
        let (scaled, scale) = standardize_values(&[7.0, 7.0, 7.0], "x").unwrap();
        assert_eq!(scale.std, 0.0);
        assert_eq!(scaled, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_finite_input() {
        let err = standardize_values(&[1.0, f64::INFINITY], "x").unwrap_err();
        match err {
            PipelineError::Computation { row, .. } => assert_eq!(row, Some(1)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_matrix_and_append() {
        let mut df = df! {
            "a" => [1.0f64, 2.0, 3.0],
            "b" => [5i64, 5, 5],
        }
        .unwrap();

        let matrix = standardize(&df, &["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(matrix.nrows(), 3);
        assert_eq!(matrix.ncols(), 2);
        assert_eq!(matrix.column_values(1), vec![0.0, 0.0, 0.0]);

        append_scaled_columns(&mut df, &matrix).unwrap();
        assert!(df.column("a Scaled").is_ok());
        assert!(df.column("b Scaled").is_ok());
        assert_eq!(df.width(), 4);
    }
}
