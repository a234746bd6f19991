//! Owner of the canonical expense collection.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::info;

use crate::currency::{sum_amounts, validate_amount, CurrencyCode};
use crate::domain::{Category, Displayable, Expense, ExpenseData, ExpenseId, Identifiable};
use crate::errors::{Result, TrackerError};

/// Single source of truth for every recorded expense.
///
/// Consumers borrow the collection read-only through [`ExpenseStore::expenses`];
/// the only mutations are [`ExpenseStore::add`] and [`ExpenseStore::remove`].
/// Identifiers come from a monotonic counter, so two additions can never
/// share an id regardless of timing.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    next_id: ExpenseId,
    currency: CurrencyCode,
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
            next_id: ExpenseId(1),
            currency: CurrencyCode::default(),
        }
    }

    /// Switches the accounting currency. Refused when a stored amount has
    /// more decimal places than the new currency keeps.
    pub fn set_currency(&mut self, currency: CurrencyCode) -> Result<()> {
        self.check_currency(&currency)?;
        self.currency = currency;
        Ok(())
    }

    /// Fails naming the first expense `currency` cannot state exactly.
    pub fn check_currency(&self, currency: &CurrencyCode) -> Result<()> {
        let precision = currency.minor_units();
        if let Some(expense) = self
            .expenses
            .iter()
            .find(|expense| validate_amount(expense.amount, precision).is_err())
        {
            return Err(TrackerError::Config(format!(
                "expense #{} ({}) cannot be stated in {}",
                expense.id,
                expense.amount,
                currency.as_str()
            )));
        }
        Ok(())
    }

    /// Builds a store around existing expenses, continuing the id sequence
    /// after the highest id present.
    pub fn from_expenses(expenses: Vec<Expense>) -> Result<Self> {
        let mut seen = HashSet::new();
        for expense in &expenses {
            if !seen.insert(expense.id) {
                return Err(TrackerError::InvalidInput(format!(
                    "duplicate expense id {}",
                    expense.id
                )));
            }
        }
        let next_id = expenses
            .iter()
            .map(|expense| expense.id)
            .max()
            .map(ExpenseId::next)
            .transpose()?
            .unwrap_or(ExpenseId(1));
        Ok(Self {
            expenses,
            next_id,
            currency: CurrencyCode::default(),
        })
    }

    /// Store pre-populated with the two starter expenses shown on first launch.
    pub fn with_sample_data() -> Self {
        let expenses: Vec<Expense> = [
            ("Lunch at downtown cafe", 12.50, Category::Food, (2024, 1, 15)),
            ("Monthly bus pass", 95.00, Category::Transportation, (2024, 1, 14)),
        ]
        .into_iter()
        .filter_map(|(description, amount, category, (y, m, d))| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|date| ExpenseData::new(description, amount, category, date))
        })
        .zip(1..)
        .map(|(data, id)| Expense::from_data(ExpenseId(id), data))
        .collect();
        Self {
            next_id: ExpenseId(expenses.len() as u64 + 1),
            expenses,
            currency: CurrencyCode::default(),
        }
    }

    /// Appends a new expense and returns the identifier assigned to it.
    pub fn add(&mut self, data: ExpenseData) -> Result<ExpenseId> {
        let id = self.next_id;
        self.next_id = id.next()?;
        let expense = Expense::from_data(id, data);
        info!(
            id = %expense.id,
            category = %expense.category,
            amount = expense.amount,
            "expense added"
        );
        self.expenses.push(expense);
        Ok(id)
    }

    /// Removes the expense identified by `id`, preserving the order of the rest.
    pub fn remove(&mut self, id: ExpenseId) -> Result<Expense> {
        let index = self
            .expenses
            .iter()
            .position(|expense| expense.id() == id)
            .ok_or(TrackerError::ExpenseNotFound(id))?;
        let removed = self.expenses.remove(index);
        info!(expense = %removed.display_label(), "expense removed");
        Ok(removed)
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id() == id)
    }

    /// Read-only view of the collection in insertion order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Sum of every amount in the collection, exact to the currency's minor unit.
    pub fn grand_total(&self) -> Result<f64> {
        sum_amounts(
            self.expenses.iter().map(|expense| expense.amount),
            self.currency.minor_units(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut store = ExpenseStore::new();
        let first = store.add(ExpenseData::new("A", 1.0, Category::Food, date(2024, 1, 1))).unwrap();
        let second = store.add(ExpenseData::new("B", 2.0, Category::Food, date(2024, 1, 1))).unwrap();
        assert_eq!(first, ExpenseId(1));
        assert_eq!(second, ExpenseId(2));
    }

    #[test]
    fn sample_data_continues_id_sequence() {
        let mut store = ExpenseStore::with_sample_data();
        assert_eq!(store.len(), 2);
        let id = store
            .add(ExpenseData::new("Movie", 14.0, Category::Entertainment, date(2024, 1, 20)))
            .unwrap();
        assert_eq!(id, ExpenseId(3));
    }

    #[test]
    fn from_expenses_rejects_duplicate_ids() {
        let expense = Expense::from_data(
            ExpenseId(4),
            ExpenseData::new("A", 1.0, Category::Other, date(2024, 1, 1)),
        );
        let err = ExpenseStore::from_expenses(vec![expense.clone(), expense]).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "unexpected: {err}");
    }

    #[test]
    fn from_expenses_starts_after_highest_id() {
        let expense = Expense::from_data(
            ExpenseId(40),
            ExpenseData::new("A", 1.0, Category::Other, date(2024, 1, 1)),
        );
        let mut store = ExpenseStore::from_expenses(vec![expense]).unwrap();
        let id = store
            .add(ExpenseData::new("B", 1.0, Category::Other, date(2024, 1, 2)))
            .unwrap();
        assert_eq!(id, ExpenseId(41));
    }

    #[test]
    fn remove_keeps_remaining_order_and_never_reuses_ids() {
        let mut store = ExpenseStore::with_sample_data();
        let removed = store.remove(ExpenseId(1)).unwrap();
        assert_eq!(removed.description, "Lunch at downtown cafe");
        assert_eq!(store.expenses()[0].id, ExpenseId(2));
        let id = store
            .add(ExpenseData::new("C", 1.0, Category::Food, date(2024, 1, 3)))
            .unwrap();
        assert_eq!(id, ExpenseId(3));
        assert!(matches!(
            store.remove(ExpenseId(1)),
            Err(TrackerError::ExpenseNotFound(ExpenseId(1)))
        ));
    }

    #[test]
    fn grand_total_covers_whole_collection() {
        let store = ExpenseStore::with_sample_data();
        assert_eq!(store.grand_total().unwrap(), 107.5);
        assert_eq!(ExpenseStore::new().grand_total().unwrap(), 0.0);
    }

    #[test]
    fn highest_possible_id_cannot_be_continued() {
        let expense = Expense::from_data(
            ExpenseId(u64::MAX),
            ExpenseData::new("A", 1.0, Category::Other, date(2024, 1, 1)),
        );
        let err = ExpenseStore::from_expenses(vec![expense]).unwrap_err();
        assert!(err.to_string().contains("exhausted"), "unexpected: {err}");

        let last = Expense::from_data(
            ExpenseId(u64::MAX - 1),
            ExpenseData::new("A", 1.0, Category::Other, date(2024, 1, 1)),
        );
        let mut store = ExpenseStore::from_expenses(vec![last]).unwrap();
        assert!(store
            .add(ExpenseData::new("B", 1.0, Category::Other, date(2024, 1, 2)))
            .is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn currency_switch_requires_amounts_to_fit() {
        let mut store = ExpenseStore::with_sample_data();
        let err = store.set_currency(CurrencyCode::new("JPY")).unwrap_err();
        assert!(err.to_string().contains("#1"), "unexpected: {err}");
        assert_eq!(store.currency().as_str(), "USD");
        assert_eq!(store.grand_total().unwrap(), 107.5);

        store.set_currency(CurrencyCode::new("EUR")).unwrap();
        assert_eq!(store.currency().as_str(), "EUR");
    }
}
