//! Budget display formatting
//!
//! Formats the overall budget status and the per-category table.

use std::collections::BTreeMap;

use crate::models::{ExpenseCategory, Trip};
use crate::services::expense_manager::{BudgetStatus, CategoryHealth, CategoryStatus};

/// Format the overall budget status
pub fn format_budget_status(status: &BudgetStatus, trip: &Trip, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Trip: {}\n", trip));
    output.push_str(&format!(
        "  Days:        {} total, {} elapsed, {} remaining\n",
        status.days_total, status.days_elapsed, status.days_remaining
    ));
    output.push('\n');
    output.push_str(&format!(
        "  Budget:      {}\n",
        status.total_budget.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Spent:       {} ({:.1}%)\n",
        status.total_spent.format_with_currency(currency),
        status.percentage_used
    ));
    output.push_str(&format!(
        "  Remaining:   {}\n",
        status.remaining_budget.format_with_currency(currency)
    ));

    if let Some(limit) = status.daily_limit {
        let flag = if status.exceeds_daily_limit() {
            " (over limit)"
        } else {
            ""
        };
        output.push_str(&format!(
            "  Daily limit: {}{}\n",
            limit.format_with_currency(currency),
            flag
        ));
    }

    output.push_str(&format!(
        "  Avg/day:     {}\n",
        status.average_daily_spending.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Recommended: {} per day\n",
        status.recommended_daily_spending.format_with_currency(currency)
    ));
    output.push('\n');
    output.push_str(&format!("  Burn rate:   {}\n", status.burn_rate_status));
    output.push_str(&format!("  Trend:       {}\n", status.spending_trend));

    if !status.over_budget_categories.is_empty() {
        let names: Vec<String> = status
            .over_budget_categories
            .iter()
            .map(ToString::to_string)
            .collect();
        output.push_str(&format!("  Over budget: {}\n", names.join(", ")));
    }

    output
}

/// Format per-category allocation and spending as a table
pub fn format_category_table(statuses: &BTreeMap<ExpenseCategory, CategoryStatus>) -> String {
    if statuses.is_empty() {
        return "No budget configured.\n\nRun 'travel-ledger init' to plan a trip.".to_string();
    }

    let name_width = statuses
        .keys()
        .map(|c| c.to_string().len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:>16}  {:>16}  {:>16}  {:>7}  {}\n",
        "Category",
        "Allocated",
        "Spent",
        "Remaining",
        "Used",
        "Status",
        width = name_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:->16}  {:->16}  {:->16}  {:->7}  {:-<11}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        width = name_width
    ));

    for (category, status) in statuses {
        let marker = match status.status {
            CategoryHealth::OverBudget => " !",
            CategoryHealth::Warning => " *",
            CategoryHealth::Ok => "",
        };
        output.push_str(&format!(
            "{:<width$}  {:>16}  {:>16}  {:>16}  {:>6.1}%  {}{}\n",
            category.to_string(),
            status.allocated.to_string(),
            status.spent.to_string(),
            status.remaining.to_string(),
            status.percentage_used,
            status.status,
            marker,
            width = name_width
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Expense, ExpenseCategory, Money};
    use crate::services::expense_manager::ExpenseManager;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn manager() -> ExpenseManager {
        let trip = Trip::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        )
        .unwrap();
        let budget =
            Budget::new(Money::from_major(5_000_000), Some(Money::from_major(100_000)), None)
                .unwrap();
        let mut manager = ExpenseManager::with_plan(trip, budget);
        manager.add_expense(
            Expense::new(
                Money::from_major(1_800_000),
                ExpenseCategory::Accommodation,
                Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap(),
                "Hotel",
                "VND",
            )
            .unwrap(),
        );
        manager
    }

    #[test]
    fn test_format_budget_status() {
        let manager = manager();
        let date = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let status = manager.get_budget_status_on(date).unwrap();
        let output = format_budget_status(&status, manager.trip().unwrap(), "VND");

        assert!(output.contains("6 total, 2 elapsed, 4 remaining"));
        assert!(output.contains("Spent:       1,800,000.00 VND (36.0%)"));
        assert!(output.contains("Daily limit: 100,000.00 VND (over limit)"));
        assert!(output.contains("Over budget: Accommodation"));
    }

    #[test]
    fn test_format_category_table() {
        let output = format_category_table(&manager().get_category_status());
        let accommodation = output
            .lines()
            .find(|l| l.starts_with("Accommodation"))
            .unwrap();
        assert!(accommodation.contains("1,500,000.00"));
        assert!(accommodation.contains("OVER_BUDGET !"));
    }

    #[test]
    fn test_format_empty_category_table() {
        assert!(format_category_table(&BTreeMap::new()).contains("travel-ledger init"));
    }
}
