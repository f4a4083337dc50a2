//! Column access helpers shared by the stages
//!
//! Numeric helpers materialize one column as a plain vector; string helpers
//! hand back the column's own array. A missing column or an unexpected null is
//! attributed to the calling stage.

use polars::prelude::*;

use super::error::{PipelineError, Result, Stage};

/// Look up a column or fail with a schema error attributed to `stage`
pub fn require_column<'a>(df: &'a DataFrame, name: &str, stage: Stage) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| PipelineError::schema(stage, name))
}

/// Numeric column as `f64`, failing on the first null
pub fn f64_values(df: &DataFrame, name: &str, stage: Stage) -> Result<Vec<f64>> {
    let column = require_column(df, name, stage)?;
    let cast = column.cast(&DataType::Float64).map_err(|_| {
        PipelineError::encoding(stage, name, format!("cannot cast {} to Float64", column.dtype()))
    })?;

    cast.f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| PipelineError::null_value(stage, name, Some(row))))
        .collect()
}

/// Integer column as `i64`, failing on the first null
pub fn i64_values(df: &DataFrame, name: &str, stage: Stage) -> Result<Vec<i64>> {
    let column = require_column(df, name, stage)?;
    let cast = column.cast(&DataType::Int64).map_err(|_| {
        PipelineError::encoding(stage, name, format!("cannot cast {} to Int64", column.dtype()))
    })?;

    cast.i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| PipelineError::null_value(stage, name, Some(row))))
        .collect()
}

/// Any column viewed as a string array (nulls preserved); non-string columns
/// are cast, string columns are shared without copying their values
pub fn string_column(df: &DataFrame, name: &str, stage: Stage) -> Result<StringChunked> {
    let column = require_column(df, name, stage)?;
    if column.dtype() == &DataType::String {
        return Ok(column.str()?.clone());
    }
    Ok(column.cast(&DataType::String)?.str()?.clone())
}

/// Like [`string_column`], failing on the first null
pub fn required_string_column(df: &DataFrame, name: &str, stage: Stage) -> Result<StringChunked> {
    let values = string_column(df, name, stage)?;
    if values.null_count() > 0 {
        let row = values.iter().position(|v| v.is_none());
        return Err(PipelineError::null_value(stage, name, row));
    }
    Ok(values)
}

/// Names of the numeric columns, in dataset order
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(|col| col.name().to_string())
        .collect()
}
