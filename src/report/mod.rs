//! Report module - console tables and JSON export of a run

pub mod run_export;
pub mod summary;

pub use run_export::*;
pub use summary::*;
