//! JSON Export functionality
//!
//! Exports the expense ledger, trip and budget inputs to JSON with schema
//! versioning, and imports them back for restore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

use crate::error::{TravelError, TravelResult};
use crate::models::{BudgetDefinition, Trip};
use crate::services::expense_manager::{ExpenseManager, LedgerEntry};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything needed to reconstruct an expense manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    #[serde(default)]
    pub trip: Option<Trip>,

    /// Budget inputs; running totals are re-derived from `expenses` on import
    #[serde(default)]
    pub budget: Option<BudgetDefinition>,

    /// Ledger in insertion order
    #[serde(default)]
    pub expenses: Vec<LedgerEntry>,
}

impl LedgerExport {
    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.expenses {
            if !seen.insert(entry.id) {
                return Err(format!("Duplicate expense id {}", entry.id));
            }
        }

        Ok(())
    }
}

/// Export a manager's ledger to JSON
pub fn export_ledger_json<W: Write>(
    manager: &ExpenseManager,
    writer: &mut W,
    pretty: bool,
) -> TravelResult<()> {
    let export = manager.export_data();

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TravelError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> TravelResult<LedgerExport> {
    let export: LedgerExport =
        serde_json::from_str(json_str).map_err(|e| TravelError::Export(e.to_string()))?;

    export.validate().map_err(TravelError::Export)?;

    Ok(export)
}
