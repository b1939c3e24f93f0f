//! Export module for travel-ledger
//!
//! Provides ledger export in multiple formats:
//! - CSV: expenses and category status (spreadsheet-compatible)
//! - JSON: machine-readable export that can be restored
//! - YAML: human-readable export that can be restored

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_category_status_csv, export_expenses_csv};
pub use json::{export_ledger_json, import_from_json, LedgerExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_ledger_yaml, import_from_yaml};
