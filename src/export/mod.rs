//! Data export
//!
//! - JSON: the full ledger, machine-readable
//! - YAML: the full ledger, human-readable
//! - CSV: one row per split, for spreadsheets

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_splits_csv;
pub use json::{export_full_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
