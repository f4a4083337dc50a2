//! Pipeline module - the feature-engineering stages and their driver

pub mod binarize;
pub mod chi_square;
pub mod cleaner;
pub mod columns;
pub mod config;
pub mod discretize;
pub mod encoder;
pub mod error;
pub mod exporter;
pub mod features;
pub mod ip_class;
pub mod loader;
pub mod outliers;
pub mod pca;
pub mod profile;
pub mod runner;
pub mod scaler;
pub mod schema;
pub mod stats;

pub use binarize::*;
pub use chi_square::*;
pub use cleaner::*;
pub use config::*;
pub use discretize::*;
pub use encoder::*;
pub use error::{PipelineError, Stage};
pub use exporter::*;
pub use features::*;
pub use ip_class::*;
pub use loader::*;
pub use outliers::*;
pub use pca::*;
pub use profile::*;
pub use runner::*;
pub use scaler::*;
