use crate::cli::ui::formatting::Formatter;
use crate::cli::ui::table_renderer::{Alignment, Table, TableColumn};
use crate::core::services::{CategoryBreakdown, ExpenseSummary};
use crate::currency::DisplayFormat;

/// Summary panel: total spent and expense count for a period.
pub fn render_summary(
    summary: &ExpenseSummary,
    format: &DisplayFormat,
    formatter: &Formatter,
) -> String {
    let total = format.amount(summary.total);
    let count = summary.count.to_string();
    format!(
        "Expense Summary ({})\n{}",
        summary.period,
        formatter.two_column_text(&[("Total Spent", &total), ("Expenses", &count)])
    )
}

pub fn render_breakdown(
    breakdown: &[CategoryBreakdown],
    format: &DisplayFormat,
    formatter: &Formatter,
) -> String {
    let mut table = Table::new(vec![
        TableColumn::new("Category", Alignment::Left),
        TableColumn::new("Count", Alignment::Right),
        TableColumn::new("Total", Alignment::Right),
    ]);
    for entry in breakdown {
        table.push_row(vec![
            entry.category.to_string(),
            entry.count.to_string(),
            format.amount(entry.total),
        ]);
    }
    table.render(formatter.preferences())
}
