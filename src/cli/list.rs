//! The expense list panel: filter selection, card states, and rendering.

use std::collections::HashMap;

use crate::cli::card::{CardState, ExpenseCard};
use crate::cli::output::OutputPreferences;
use crate::core::services::{CategoryFilter, ExpenseListState, FilteredExpenses, ListStatus};
use crate::currency::DisplayFormat;
use crate::domain::{Expense, ExpenseId};
use crate::errors::Result;

pub const EMPTY_MESSAGE: &str = "No expenses found. Add some expenses to get started!";

/// Owns UI state only; expense data is always borrowed from the store.
#[derive(Debug, Default)]
pub struct ExpenseList {
    state: ExpenseListState,
    cards: HashMap<ExpenseId, CardState>,
}

impl ExpenseList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> CategoryFilter {
        self.state.filter()
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.state.set_filter(filter);
    }

    pub fn derive<'a>(
        &self,
        expenses: &'a [Expense],
        format: &DisplayFormat,
    ) -> Result<FilteredExpenses<'a>> {
        self.state.derive(expenses, format.precision())
    }

    pub fn card_state(&self, id: ExpenseId) -> CardState {
        self.cards.get(&id).copied().unwrap_or_default()
    }

    pub fn card<'a>(&self, expense: &'a Expense) -> ExpenseCard<'a> {
        ExpenseCard::new(expense).with_state(self.card_state(expense.id))
    }

    pub fn toggle_highlight(&mut self, expense: &Expense) -> CardState {
        let mut card = self.card(expense);
        card.toggle_highlight();
        self.remember(expense.id, card.state())
    }

    pub fn toggle_category_visible(&mut self, expense: &Expense) -> CardState {
        let mut card = self.card(expense);
        card.toggle_category_visible();
        self.remember(expense.id, card.state())
    }

    /// Drops the card state of an expense that left the collection.
    pub fn forget(&mut self, id: ExpenseId) {
        self.cards.remove(&id);
    }

    fn remember(&mut self, id: ExpenseId, state: CardState) -> CardState {
        if state == CardState::default() {
            self.cards.remove(&id);
        } else {
            self.cards.insert(id, state);
        }
        state
    }

    pub fn render(
        &self,
        expenses: &[Expense],
        format: &DisplayFormat,
        prefs: &OutputPreferences,
    ) -> Result<String> {
        let view = self.derive(expenses, format)?;
        let mut lines = vec![
            format!("Filter by category: {}", self.filter()),
            format!(
                "Total: {} ({} expenses)",
                format.amount(view.total),
                view.count
            ),
            String::new(),
        ];
        match view.status() {
            ListStatus::NoExpenses => lines.push(EMPTY_MESSAGE.to_string()),
            ListStatus::Showing(_) => {
                let cards: Vec<String> = view
                    .expenses
                    .iter()
                    .map(|expense| self.card(expense).render(format, prefs))
                    .collect();
                lines.push(cards.join("\n\n"));
            }
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExpenseStore;
    use crate::domain::Category;

    const PLAIN: OutputPreferences = OutputPreferences {
        plain_mode: true,
        quiet_mode: false,
    };

    #[test]
    fn renders_empty_message_for_unmatched_filter() {
        let store = ExpenseStore::with_sample_data();
        let mut list = ExpenseList::new();
        list.set_filter(CategoryFilter::Only(Category::Shopping));
        let text = list
            .render(store.expenses(), &DisplayFormat::default(), &PLAIN)
            .unwrap();
        assert!(text.contains("Total: $0.00 (0 expenses)"), "{text}");
        assert!(text.ends_with(EMPTY_MESSAGE), "{text}");
    }

    #[test]
    fn renders_filtered_cards_with_total() {
        let store = ExpenseStore::with_sample_data();
        let mut list = ExpenseList::new();
        list.set_filter(CategoryFilter::Only(Category::Transportation));
        let text = list
            .render(store.expenses(), &DisplayFormat::default(), &PLAIN)
            .unwrap();
        assert!(text.contains("Filter by category: Transportation"), "{text}");
        assert!(text.contains("Total: $95.00 (1 expenses)"), "{text}");
        assert!(text.contains("Monthly bus pass"));
        assert!(!text.contains("Lunch at downtown cafe"));
    }

    #[test]
    fn card_state_survives_rerender_and_resets_when_toggled_back() {
        let store = ExpenseStore::with_sample_data();
        let mut list = ExpenseList::new();
        let lunch = &store.expenses()[0];
        assert!(list.toggle_highlight(lunch).highlighted);
        assert!(list.card_state(lunch.id).highlighted);
        assert!(!list.toggle_highlight(lunch).highlighted);
        assert!(list.cards.is_empty());
    }
}
