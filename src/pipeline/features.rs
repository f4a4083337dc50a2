//! Derived payload features: payload length and packet efficiency

use polars::prelude::*;
use serde::Serialize;

use super::columns::{f64_values, required_string_column};
use super::config::EmptyPayloadPolicy;
use super::error::{PipelineError, Result, Stage};
use super::schema::{PACKET_EFFICIENCY, PACKET_LENGTH, PAYLOAD_DATA, PAYLOAD_LENGTH};

/// Outcome of feature engineering, for the run report
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeatureOutcome {
    /// Rows removed by the drop-rows empty-payload policy
    pub dropped_empty_payloads: usize,
    /// Rows that received the sentinel efficiency
    pub sentinel_rows: usize,
}

/// Character count of each payload; a null payload is an error.
/// Counts Unicode scalar values, not bytes.
pub fn payload_lengths(df: &DataFrame) -> Result<Vec<i64>> {
    let payloads = required_string_column(df, PAYLOAD_DATA, Stage::FeatureEngineer)?;
    Ok(payloads
        .str_len_chars()
        .into_no_null_iter()
        .map(i64::from)
        .collect())
}

/// `packet_length / payload_length` per row
///
/// Zero-length payloads are resolved by `policy`: `Fail` reports the first
/// offending row, `Sentinel` substitutes the given value. `DropRows` must have
/// been applied beforehand and is treated like `Fail` here.
pub fn packet_efficiency(
    packet_lengths: &[f64],
    payload_lengths: &[i64],
    policy: EmptyPayloadPolicy,
) -> Result<Vec<f64>> {
    packet_lengths
        .iter()
        .zip(payload_lengths)
        .enumerate()
        .map(|(row, (&packet, &payload))| {
            if payload == 0 {
                return match policy {
                    EmptyPayloadPolicy::Sentinel(v) => Ok(v),
                    _ => Err(PipelineError::computation(
                        Stage::FeatureEngineer,
                        PACKET_EFFICIENCY,
                        Some(row),
                        "payload length is zero, efficiency is undefined",
                    )),
                };
            }
            let efficiency = packet / payload as f64;
            if !efficiency.is_finite() {
                return Err(PipelineError::computation(
                    Stage::FeatureEngineer,
                    PACKET_EFFICIENCY,
                    Some(row),
                    format!("non-finite result {}", efficiency),
                ));
            }
            Ok(efficiency)
        })
        .collect()
}

/// Add `Payload Length` and `Packet Efficiency` to the dataset
pub fn engineer_features(
    df: DataFrame,
    policy: EmptyPayloadPolicy,
) -> Result<(DataFrame, FeatureOutcome)> {
    let mut outcome = FeatureOutcome::default();
    let mut lengths = payload_lengths(&df)?;

    let mut df = if policy == EmptyPayloadPolicy::DropRows && lengths.contains(&0) {
        let keep: BooleanChunked = lengths.iter().map(|&len| len > 0).collect();
        outcome.dropped_empty_payloads = lengths.iter().filter(|&&len| len == 0).count();
        lengths.retain(|&len| len > 0);
        df.filter(&keep)?
    } else {
        df
    };

    let packet_lengths = f64_values(&df, PACKET_LENGTH, Stage::FeatureEngineer)?;
    let efficiency = packet_efficiency(&packet_lengths, &lengths, policy)?;
    if let EmptyPayloadPolicy::Sentinel(_) = policy {
        outcome.sentinel_rows = lengths.iter().filter(|&&len| len == 0).count();
    }

    df.with_column(Column::new(PAYLOAD_LENGTH.into(), lengths))?;
    df.with_column(Column::new(PACKET_EFFICIENCY.into(), efficiency))?;

    Ok((df, outcome))
}
