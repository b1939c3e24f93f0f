//! Activity display formatting
//!
//! Formats activity lists and the activity-expense reconciliation summary.

use crate::models::{Activity, Money};
use crate::services::integrated::ActivityExpenseSummary;

fn cost_or_dash(cost: Option<Money>) -> String {
    cost.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format activities as a table
pub fn format_activity_list(activities: &[&Activity]) -> String {
    if activities.is_empty() {
        return "No activities found.".to_string();
    }

    let title_width = activities
        .iter()
        .map(|a| a.title.len())
        .max()
        .unwrap_or(5)
        .clamp(5, 32);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<width$}  {:<14}  {:<11}  {:<16}  {:>16}  {:>16}\n",
        "ID",
        "Title",
        "Type",
        "Status",
        "Start",
        "Estimated",
        "Actual",
        width = title_width
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<width$}  {:-<14}  {:-<11}  {:-<16}  {:->16}  {:->16}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        width = title_width
    ));

    for activity in activities {
        let start = activity
            .start_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let title: String = activity.title.chars().take(title_width).collect();

        output.push_str(&format!(
            "{:<12}  {:<width$}  {:<14}  {:<11}  {:<16}  {:>16}  {:>16}\n",
            activity.id.to_string(),
            title,
            activity.activity_type.to_string(),
            activity.status.to_string(),
            start,
            activity.estimated_cost().to_string(),
            cost_or_dash(activity.actual_cost()),
            width = title_width
        ));
    }

    output
}

/// Format the activity-expense summary
pub fn format_activity_summary(summary: &ActivityExpenseSummary) -> String {
    let mut output = String::new();

    output.push_str("Activity Costs\n");
    output.push_str(&format!(
        "  Activities:  {} ({} synced, {} without actual cost)\n",
        summary.total_activities, summary.synced_activities, summary.unsynced_activities
    ));
    output.push_str(&format!("  Estimated:   {}\n", summary.total_estimated_cost));
    output.push_str(&format!("  Actual:      {}\n", summary.total_actual_cost));
    output.push_str(&format!("  Variance:    {}\n", summary.cost_variance));

    if !summary.activities.is_empty() {
        output.push('\n');
        for row in &summary.activities {
            let sync_mark = if row.synced { "synced" } else { "-" };
            output.push_str(&format!(
                "  {:<12}  {:<24}  {:>16}  {:>16}  {:>16}  {}\n",
                row.activity_id.to_string(),
                row.title.chars().take(24).collect::<String>(),
                row.estimated_cost.to_string(),
                cost_or_dash(row.actual_cost),
                cost_or_dash(row.variance),
                sync_mark
            ));
        }
    }

    if let Some(status) = &summary.budget_status {
        output.push('\n');
        output.push_str(&format!(
            "Budget: {} of {} spent ({:.1}%), {}\n",
            status.total_spent, status.total_budget, status.percentage_used, status.burn_rate_status
        ));
    }

    output
}
