//! Discretization of numeric columns into ordered labels
//!
//! Ports use fixed IANA bands. Packet length and anomaly score use
//! equal-width bins whose edges are computed from the current data.

use polars::prelude::*;
use serde::Serialize;

use super::columns::{f64_values, i64_values};
use super::config::{EqualWidthRule, PortBandLabels, PortRule};
use super::error::{PipelineError, Result, Stage};
use super::schema::{derived_name, BINNED_SUFFIX};

/// Upper bound of the system (well-known) port band
pub const SYSTEM_PORT_MAX: i64 = 1023;
/// Upper bound of the user/registered port band
pub const USER_PORT_MAX: i64 = 49151;
/// Highest valid port
pub const PORT_MAX: i64 = 65535;

/// Edges computed for one equal-width column, for the run report
#[derive(Debug, Clone, Serialize)]
pub struct BinEdges {
    pub column: String,
    /// `labels.len() + 1` ascending edges; bins are right-closed
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
}

/// Label of the band containing `port`, or `None` outside 0..=65535
pub fn port_band(port: i64, labels: &PortBandLabels) -> Option<&str> {
    match port {
        0..=SYSTEM_PORT_MAX => Some(&labels.system),
        1024..=USER_PORT_MAX => Some(&labels.user),
        49152..=PORT_MAX => Some(&labels.dynamic),
        _ => None,
    }
}

/// Compute `bins + 1` equal-width edges over `[min, max]`
///
/// The lowest edge is pulled down by 0.1% of the range so the minimum lands in
/// the first bin. A zero range is widened by 0.1% of |value| (0.001 at zero)
/// on both sides.
pub fn equal_width_edges(values: &[f64], bins: usize) -> Option<Vec<f64>> {
    if values.is_empty() || bins == 0 {
        return None;
    }

    let (mut min, mut max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    let widened = min == max;
    if widened {
        let pad = if min != 0.0 { 0.001 * min.abs() } else { 0.001 };
        min -= pad;
        max += pad;
    }

    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    edges[bins] = max;
    if !widened {
        edges[0] -= (max - min) * 0.001;
    }
    Some(edges)
}

/// Index of the right-closed bin `(edges[i], edges[i + 1]]` holding `value`
pub fn bin_index(value: f64, edges: &[f64]) -> Option<usize> {
    let bins = edges.len().checked_sub(1)?;
    if value <= edges[0] || value > edges[bins] {
        return None;
    }
    (0..bins).find(|&i| value <= edges[i + 1])
}

/// Add `<column> Binned` for each port rule
pub fn bin_ports(df: &mut DataFrame, rules: &[PortRule]) -> Result<()> {
    for rule in rules {
        let ports = i64_values(df, &rule.column, Stage::Discretizer)?;
        let labels: Vec<&str> = ports
            .iter()
            .enumerate()
            .map(|(row, &port)| {
                port_band(port, &rule.labels).ok_or_else(|| {
                    PipelineError::computation(
                        Stage::Discretizer,
                        rule.column.as_str(),
                        Some(row),
                        format!("port {} outside 0..={}", port, PORT_MAX),
                    )
                })
            })
            .collect::<Result<_>>()?;

        let name = derived_name(&rule.column, BINNED_SUFFIX);
        df.with_column(Column::new(name.into(), labels))?;
    }
    Ok(())
}

/// Add `<column> Binned` for each equal-width rule, returning the edges used
pub fn bin_equal_width(df: &mut DataFrame, rules: &[EqualWidthRule]) -> Result<Vec<BinEdges>> {
    let mut all_edges = Vec::with_capacity(rules.len());

    for rule in rules {
        if rule.labels.is_empty() {
            return Err(PipelineError::configuration(format!(
                "equal-width binning of '{}' needs at least one label",
                rule.column
            )));
        }

        let values = f64_values(df, &rule.column, Stage::Discretizer)?;
        if values.is_empty() {
            continue;
        }

        let edges = equal_width_edges(&values, rule.labels.len()).ok_or_else(|| {
            PipelineError::computation(
                Stage::Discretizer,
                rule.column.as_str(),
                None,
                "column contains non-finite values",
            )
        })?;

        let labels: Vec<&str> = values
            .iter()
            .enumerate()
            .map(|(row, &v)| {
                bin_index(v, &edges)
                    .map(|i| rule.labels[i].as_str())
                    .ok_or_else(|| {
                        PipelineError::computation(
                            Stage::Discretizer,
                            rule.column.as_str(),
                            Some(row),
                            format!("value {} outside bin edges", v),
                        )
                    })
            })
            .collect::<Result<_>>()?;

        let name = derived_name(&rule.column, BINNED_SUFFIX);
        df.with_column(Column::new(name.into(), labels))?;

        all_edges.push(BinEdges {
            column: rule.column.clone(),
            edges,
            labels: rule.labels.clone(),
        });
    }

    Ok(all_edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_labels() -> PortBandLabels {
        PortBandLabels {
            system: "System".into(),
            user: "User".into(),
            dynamic: "Dynamic/Private".into(),
        }
    }

    #[test]
    fn test_port_band_boundaries() {
        let labels = source_labels();
        assert_eq!(port_band(0, &labels), Some("System"));
        assert_eq!(port_band(1023, &labels), Some("System"));
        assert_eq!(port_band(1024, &labels), Some("User"));
        assert_eq!(port_band(49151, &labels), Some("User"));
        assert_eq!(port_band(49152, &labels), Some("Dynamic/Private"));
        assert_eq!(port_band(65535, &labels), Some("Dynamic/Private"));
        assert_eq!(port_band(65536, &labels), None);
        assert_eq!(port_band(-1, &labels), None);
    }

    #[test]
    fn test_port_band_is_total() {
        let labels = source_labels();
        assert!((0..=PORT_MAX).all(|p| port_band(p, &labels).is_some()));
    }

    #[test]
    fn test_equal_width_edges_span_data() {
        let edges = equal_width_edges(&[0.0, 30.0, 60.0, 90.0], 3).unwrap();
        assert_eq!(edges.len(), 4);
        assert!(edges[0] < 0.0);
        assert_eq!(edges[1], 30.0);
        assert_eq!(edges[2], 60.0);
        assert_eq!(edges[3], 90.0);
    }

    #[test]
    fn test_bins_are_right_closed() {
        let edges = equal_width_edges(&[0.0, 90.0], 3).unwrap();
        assert_eq!(bin_index(0.0, &edges), Some(0));
        assert_eq!(bin_index(30.0, &edges), Some(0));
        assert_eq!(bin_index(30.5, &edges), Some(1));
        assert_eq!(bin_index(60.0, &edges), Some(1));
        assert_eq!(bin_index(90.0, &edges), Some(2));
        assert_eq!(bin_index(90.1, &edges), None);
    }

    #[test]
    fn test_constant_column_lands_in_middle_bin() {
        let edges = equal_width_edges(&[5.0, 5.0, 5.0], 3).unwrap();
        assert_eq!(bin_index(5.0, &edges), Some(1));

        let edges = equal_width_edges(&[0.0, 0.0], 3).unwrap();
        assert_eq!(bin_index(0.0, &edges), Some(1));
    }

    #[test]
    fn test_bin_equal_width_adds_labels() {
        let mut df = df! { "Packet Length" => [64i64, 700, 1500, 900] }.unwrap();
        let rules = vec![EqualWidthRule {
            column: "Packet Length".into(),
            labels: vec!["Small".into(), "Medium".into(), "Large".into()],
        }];

        let edges = bin_equal_width(&mut df, &rules).unwrap();
        assert_eq!(edges.len(), 1);

        let labels: Vec<&str> = df
            .column("Packet Length Binned")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(labels, vec!["Small", "Medium", "Large", "Medium"]);
    }

    #[test]
    fn test_bin_ports_rejects_out_of_range() {
        let mut df = df! { "Source Port" => [80i64, 70000] }.unwrap();
        let rules = vec![PortRule {
            column: "Source Port".into(),
            labels: source_labels(),
        }];

        let err = bin_ports(&mut df, &rules).unwrap_err();
        assert!(matches!(err, PipelineError::Computation { row: Some(1), .. }));
    }
}
