//! Category filtering and aggregation over the expense collection.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::currency::sum_amounts;
use crate::domain::{Amounted, BelongsToCategory, Category, Expense};
use crate::errors::TrackerError;

/// Category selection applied to the expense list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, item: &impl BelongsToCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => item.category() == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All Categories",
            CategoryFilter::Only(category) => category.label(),
        }
    }

    /// Every selectable filter, `All` first.
    pub fn options() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.iter().copied().map(CategoryFilter::Only))
            .collect()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = TrackerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("all categories") {
            return Ok(CategoryFilter::All);
        }
        trimmed.parse::<Category>().map(CategoryFilter::Only)
    }
}

/// Presence signal for a derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    NoExpenses,
    Showing(usize),
}

/// Filtered projection of the collection along with its aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredExpenses<'a> {
    pub expenses: Vec<&'a Expense>,
    pub total: f64,
    pub count: usize,
}

impl FilteredExpenses<'_> {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn status(&self) -> ListStatus {
        if self.is_empty() {
            ListStatus::NoExpenses
        } else {
            ListStatus::Showing(self.count)
        }
    }
}

pub struct FilterService;

impl FilterService {
    /// Stable single-pass filter plus a minor-unit sum of the survivors.
    pub fn derive<'a>(
        expenses: &'a [Expense],
        filter: CategoryFilter,
        precision: u8,
    ) -> Result<FilteredExpenses<'a>, TrackerError> {
        let visible: Vec<&Expense> = expenses
            .iter()
            .filter(|expense| filter.matches(*expense))
            .collect();
        let total = sum_amounts(visible.iter().map(|expense| expense.amount()), precision)?;
        let count = visible.len();
        Ok(FilteredExpenses {
            expenses: visible,
            total,
            count,
        })
    }
}

/// List-level UI state: only the selected filter, never expense data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseListState {
    filter: CategoryFilter,
}

impl ExpenseListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        debug!(from = %self.filter, to = %filter, "filter changed");
        self.filter = filter;
    }

    pub fn derive<'a>(
        &self,
        expenses: &'a [Expense],
        precision: u8,
    ) -> Result<FilteredExpenses<'a>, TrackerError> {
        FilterService::derive(expenses, self.filter, precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseData, ExpenseId};
    use chrono::NaiveDate;

    fn expense(id: u64, amount: f64, category: Category) -> Expense {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Expense::from_data(
            ExpenseId(id),
            ExpenseData::new(format!("item {id}"), amount, category, date),
        )
    }

    #[test]
    fn all_filter_is_identity() {
        let expenses = vec![
            expense(1, 1.0, Category::Other),
            expense(2, 2.0, Category::Food),
        ];
        let view = FilterService::derive(&expenses, CategoryFilter::All, 2).unwrap();
        let ids: Vec<_> = view.expenses.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![ExpenseId(1), ExpenseId(2)]);
        assert_eq!(view.count, 2);
        assert_eq!(view.total, 3.0);
    }

    #[test]
    fn category_filter_is_stable() {
        let expenses = vec![
            expense(1, 1.0, Category::Food),
            expense(2, 2.0, Category::Shopping),
            expense(3, 3.0, Category::Food),
        ];
        let view = FilterService::derive(&expenses, CategoryFilter::Only(Category::Food), 2).unwrap();
        let ids: Vec<_> = view.expenses.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![ExpenseId(1), ExpenseId(3)]);
        assert_eq!(view.total, 4.0);
        assert_eq!(view.status(), ListStatus::Showing(2));
    }

    #[test]
    fn empty_result_is_signalled() {
        let expenses = vec![expense(1, 1.0, Category::Food)];
        let view =
            FilterService::derive(&expenses, CategoryFilter::Only(Category::Other), 2).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.total, 0.0);
        assert_eq!(view.status(), ListStatus::NoExpenses);
        assert_eq!(
            FilterService::derive(&[], CategoryFilter::All, 2)
                .unwrap()
                .status(),
            ListStatus::NoExpenses
        );
    }

    #[test]
    fn oversized_total_is_an_error() {
        let expenses = vec![
            expense(1, 6e16, Category::Food),
            expense(2, 6e16, Category::Food),
        ];
        let err = FilterService::derive(&expenses, CategoryFilter::All, 2).unwrap_err();
        assert!(
            matches!(err, TrackerError::AmountOutOfRange(_)),
            "unexpected error: {err:?}"
        );
        let view = FilterService::derive(&expenses, CategoryFilter::Only(Category::Other), 2)
            .unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn parses_filter_labels() {
        assert_eq!("ALL".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "entertainment".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Entertainment)
        );
        assert!("Travel".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn list_state_defaults_to_all() {
        let mut state = ExpenseListState::new();
        assert_eq!(state.filter(), CategoryFilter::All);
        state.set_filter(CategoryFilter::Only(Category::Food));
        assert_eq!(state.filter(), CategoryFilter::Only(Category::Food));
        assert_eq!(CategoryFilter::options().len(), 6);
    }
}
