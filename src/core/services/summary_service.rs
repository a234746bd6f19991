use crate::core::expense_store::ExpenseStore;
use crate::currency::sum_amounts;
use crate::domain::{Amounted, BelongsToCategory, Category, Expense};
use crate::errors::Result;

/// Default period label when the caller does not name one.
pub const DEFAULT_PERIOD: &str = "All Time";

/// Precomputed figures for the summary panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    pub total: f64,
    pub count: usize,
    pub period: String,
}

/// Total and count for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub total: f64,
    pub count: usize,
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(store: &ExpenseStore, period: Option<&str>) -> Result<ExpenseSummary> {
        Ok(ExpenseSummary {
            total: store.grand_total()?,
            count: store.len(),
            period: period.unwrap_or(DEFAULT_PERIOD).to_string(),
        })
    }

    /// Per-category totals in enumeration order; categories without expenses are skipped.
    pub fn by_category(expenses: &[Expense], precision: u8) -> Result<Vec<CategoryBreakdown>> {
        Category::ALL
            .iter()
            .filter_map(|category| {
                let amounts: Vec<f64> = expenses
                    .iter()
                    .filter(|expense| expense.category() == *category)
                    .map(Amounted::amount)
                    .collect();
                if amounts.is_empty() {
                    return None;
                }
                let count = amounts.len();
                Some(sum_amounts(amounts, precision).map(|total| CategoryBreakdown {
                    category: *category,
                    count,
                    total,
                }))
            })
            .collect()
    }
}
