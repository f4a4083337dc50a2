//! Classful IPv4 categorization by leading octet

use polars::prelude::*;

use super::columns::required_string_column;
use super::error::{PipelineError, Result, Stage};

pub const CLASS_A: &str = "Class A";
pub const CLASS_B: &str = "Class B";
pub const CLASS_C: &str = "Class C";
pub const CLASS_D: &str = "Class D";
pub const CLASS_E: &str = "Class E";

/// Class of a leading octet value.
/// 0 and 127 are not in any A–D range and fall through to Class E.
pub fn class_for_octet(octet: u32) -> &'static str {
    match octet {
        1..=126 => CLASS_A,
        128..=191 => CLASS_B,
        192..=223 => CLASS_C,
        224..=239 => CLASS_D,
        _ => CLASS_E,
    }
}

/// Classify a dotted-quad address by its first field only.
/// Returns `None` when the first field is not a non-negative integer.
pub fn classify_ipv4(address: &str) -> Option<&'static str> {
    let first = address.trim().split('.').next()?;
    first.parse::<u32>().ok().map(class_for_octet)
}

/// Add a class column for each `(source, output)` pair
pub fn add_ip_classes(df: &mut DataFrame, columns: &[(String, String)]) -> Result<()> {
    for (source, output) in columns {
        let addresses = required_string_column(df, source, Stage::IpClassifier)?;
        let classes: Vec<&str> = addresses
            .into_no_null_iter()
            .map(|addr| {
                classify_ipv4(addr).ok_or_else(|| {
                    PipelineError::encoding(
                        Stage::IpClassifier,
                        source.as_str(),
                        format!("'{}' does not start with a numeric octet", addr),
                    )
                })
            })
            .collect::<Result<_>>()?;

        df.with_column(Column::new(output.as_str().into(), classes))?;
    }
    Ok(())
}
