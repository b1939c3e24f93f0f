//! YAML Export functionality
//!
//! Exports the ledger to YAML for a human-readable backup.

use std::io::Write;

use crate::error::{TravelError, TravelResult};
use crate::export::json::LedgerExport;
use crate::services::expense_manager::ExpenseManager;

/// Export a manager's ledger to YAML
pub fn export_ledger_yaml<W: Write>(manager: &ExpenseManager, writer: &mut W) -> TravelResult<()> {
    let export = manager.export_data();

    writeln!(writer, "# travel-ledger export")
        .and_then(|_| writeln!(writer, "# Generated: {}", export.exported_at))
        .and_then(|_| writeln!(writer))
        .map_err(|e| TravelError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| TravelError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> TravelResult<LedgerExport> {
    let export: LedgerExport =
        serde_yaml::from_str(yaml_str).map_err(|e| TravelError::Export(e.to_string()))?;

    export.validate().map_err(TravelError::Export)?;

    Ok(export)
}
