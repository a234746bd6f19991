//! Presentation of a single expense with its UI-local toggles.

use colored::Colorize;

use crate::cli::output::OutputPreferences;
use crate::currency::DisplayFormat;
use crate::domain::{Expense, ExpenseId};

/// Display flags owned by one card. They never flow back into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardState {
    pub highlighted: bool,
    pub category_visible: bool,
}

impl Default for CardState {
    fn default() -> Self {
        Self {
            highlighted: false,
            category_visible: true,
        }
    }
}

type DeleteHandler<'a> = Box<dyn FnMut(ExpenseId) + 'a>;

pub struct ExpenseCard<'a> {
    expense: &'a Expense,
    state: CardState,
    on_delete: Option<DeleteHandler<'a>>,
}

impl<'a> ExpenseCard<'a> {
    pub fn new(expense: &'a Expense) -> Self {
        Self {
            expense,
            state: CardState::default(),
            on_delete: None,
        }
    }

    pub fn with_state(mut self, state: CardState) -> Self {
        self.state = state;
        self
    }

    /// Supplies the callback invoked by [`ExpenseCard::request_delete`].
    pub fn on_delete(mut self, handler: impl FnMut(ExpenseId) + 'a) -> Self {
        self.on_delete = Some(Box::new(handler));
        self
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn toggle_highlight(&mut self) {
        self.state.highlighted = !self.state.highlighted;
    }

    pub fn toggle_category_visible(&mut self) {
        self.state.category_visible = !self.state.category_visible;
    }

    /// Hands this card's id to the delete handler, if one was supplied.
    /// Returns whether a handler ran.
    pub fn request_delete(&mut self) -> bool {
        match self.on_delete.as_mut() {
            Some(handler) => {
                handler(self.expense.id);
                true
            }
            None => false,
        }
    }

    pub fn render(&self, format: &DisplayFormat, prefs: &OutputPreferences) -> String {
        let marker = match (self.state.highlighted, prefs.plain_mode) {
            (true, true) => "*",
            (true, false) => "★",
            (false, _) => " ",
        };
        let mut header = format!("{} #{}", marker, self.expense.id);
        if self.state.category_visible {
            header.push_str(&format!("  [{}]", self.expense.category));
        }
        header.push_str(&format!("  {}", format.date(self.expense.date)));

        let body = format!(
            "    {}  {}",
            self.expense.description,
            format.amount(self.expense.amount)
        );

        if self.state.highlighted && !prefs.plain_mode {
            format!("{}\n{}", header.bold(), body.bold())
        } else {
            format!("{}\n{}", header, body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, ExpenseData};
    use chrono::NaiveDate;

    const PLAIN: OutputPreferences = OutputPreferences {
        plain_mode: true,
        quiet_mode: false,
    };

    fn lunch() -> Expense {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        Expense::from_data(
            ExpenseId(1),
            ExpenseData::new("Lunch at downtown cafe", 12.5, Category::Food, date),
        )
    }

    #[test]
    fn renders_category_date_and_amount() {
        let expense = lunch();
        let card = ExpenseCard::new(&expense);
        let text = card.render(&DisplayFormat::default(), &PLAIN);
        assert_eq!(
            text,
            "  #1  [Food]  Jan 15, 2024\n    Lunch at downtown cafe  $12.50"
        );
    }

    #[test]
    fn toggles_are_local() {
        let expense = lunch();
        let mut card = ExpenseCard::new(&expense);
        card.toggle_highlight();
        card.toggle_category_visible();
        assert_eq!(
            card.state(),
            CardState {
                highlighted: true,
                category_visible: false
            }
        );
        let text = card.render(&DisplayFormat::default(), &PLAIN);
        assert!(text.starts_with("* #1  Jan 15, 2024"), "{text}");
        assert!(!text.contains("[Food]"));
    }

    #[test]
    fn delete_without_handler_is_a_no_op() {
        let expense = lunch();
        let mut card = ExpenseCard::new(&expense);
        assert!(!card.request_delete());
    }

    #[test]
    fn delete_reports_card_id() {
        let expense = lunch();
        let mut requested = Vec::new();
        {
            let mut card = ExpenseCard::new(&expense).on_delete(|id| requested.push(id));
            assert!(card.request_delete());
        }
        assert_eq!(requested, vec![ExpenseId(1)]);
    }
}
