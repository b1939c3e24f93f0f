//! Expense display formatting

use crate::services::expense_manager::LedgerEntry;

/// Format ledger entries as a register, with a total line
///
/// `mirrored` reports whether an entry belongs to an activity.
pub fn format_expense_register(
    entries: &[LedgerEntry],
    mirrored: impl Fn(&LedgerEntry) -> bool,
) -> String {
    if entries.is_empty() {
        return "No expenses recorded.".to_string();
    }

    let desc_width = entries
        .iter()
        .map(|e| e.expense.description().len())
        .max()
        .unwrap_or(11)
        .clamp(11, 40);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<16}  {:<width$}  {:>16}\n",
        "ID",
        "Date",
        "Category",
        "Description",
        "Amount",
        width = desc_width
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<16}  {:-<width$}  {:->16}\n",
        "",
        "",
        "",
        "",
        "",
        width = desc_width
    ));

    for entry in entries {
        let expense = &entry.expense;
        let mut description: String = expense.description().chars().take(desc_width).collect();
        if mirrored(entry) {
            let shortened: String = description.chars().take(desc_width - 1).collect();
            description = format!("{}*", shortened);
        }
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<16}  {:<width$}  {:>16}\n",
            entry.id.to_string(),
            expense.day().format("%Y-%m-%d").to_string(),
            expense.category().to_string(),
            description,
            expense.amount().format_with_currency(expense.currency()),
            width = desc_width
        ));
    }

    let total: crate::models::Money = entries.iter().map(|e| e.expense.amount()).sum();
    output.push_str(&format!("\n{} expense(s), total {}\n", entries.len(), total));

    if entries.iter().any(&mirrored) {
        output.push_str("* recorded from an activity cost\n");
    }

    output
}
