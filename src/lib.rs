//! netfeat: Feature Engineering Library for Network-Security Event Logs
//!
//! A batch pipeline that cleans, enriches, discretizes, encodes, scores and
//! filters tabular network traffic records.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
