//! CSV Export functionality
//!
//! Exports the expense ledger and per-category budget status in a
//! spreadsheet-compatible format.

use std::io::Write;

use crate::error::{TravelError, TravelResult};
use crate::services::expense_manager::ExpenseManager;

/// Export every ledger entry, one row per expense
pub fn export_expenses_csv<W: Write>(manager: &ExpenseManager, writer: W) -> TravelResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["ID", "Date", "Category", "Description", "Amount", "Currency"])
        .map_err(|e| TravelError::Export(e.to_string()))?;

    for entry in manager.entries() {
        let expense = &entry.expense;
        csv_writer
            .write_record([
                entry.id.as_uuid().to_string(),
                expense.date().to_rfc3339(),
                expense.category().code().to_string(),
                expense.description().to_string(),
                format_plain(expense.amount().cents()),
                expense.currency().to_string(),
            ])
            .map_err(|e| TravelError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TravelError::Export(e.to_string()))?;
    Ok(())
}

/// Export allocation vs. spending per category
pub fn export_category_status_csv<W: Write>(
    manager: &ExpenseManager,
    writer: W,
) -> TravelResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["Category", "Allocated", "Spent", "Remaining", "Percent Used", "Status"])
        .map_err(|e| TravelError::Export(e.to_string()))?;

    for (category, status) in manager.get_category_status() {
        csv_writer
            .write_record([
                category.code().to_string(),
                format_plain(status.allocated.cents()),
                format_plain(status.spent.cents()),
                format_plain(status.remaining.cents()),
                format!("{:.1}", status.percentage_used),
                status.status.to_string(),
            ])
            .map_err(|e| TravelError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TravelError::Export(e.to_string()))?;
    Ok(())
}

/// Minor units as a plain decimal string without separators
fn format_plain(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, (cents / 100).abs(), (cents % 100).abs())
}
