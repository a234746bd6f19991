//! Business logic helpers for managing expenses.

use crate::core::expense_store::ExpenseStore;
use crate::core::services::{ServiceError, ServiceResult};
use crate::currency::validate_amount;
use crate::domain::{Expense, ExpenseData, ExpenseId};

/// Provides validated helpers around the store's mutations.
pub struct ExpenseService;

impl ExpenseService {
    /// Adds a new expense and returns its identifier.
    ///
    /// The form validates before emitting; this re-checks the invariants the
    /// store relies on so payloads built elsewhere cannot bypass them.
    pub fn add(store: &mut ExpenseStore, data: ExpenseData) -> ServiceResult<ExpenseId> {
        let description = data.description.trim();
        if description.is_empty() {
            return Err(ServiceError::Invalid("Description is required".into()));
        }
        validate_amount(data.amount, store.currency().minor_units())
            .map_err(|err| ServiceError::Invalid(err.to_string()))?;
        let normalized = ExpenseData {
            description: description.to_string(),
            ..data
        };
        Ok(store.add(normalized)?)
    }

    /// Removes the expense identified by `id`, returning the removed instance.
    pub fn remove(store: &mut ExpenseStore, id: ExpenseId) -> ServiceResult<Expense> {
        store.remove(id).map_err(ServiceError::from)
    }

    /// Returns a snapshot of the store's expenses.
    pub fn list(store: &ExpenseStore) -> Vec<&Expense> {
        store.expenses().iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::errors::TrackerError;
    use chrono::NaiveDate;

    fn sample(amount: f64) -> ExpenseData {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ExpenseData::new("  Coffee ", amount, Category::Food, date)
    }

    #[test]
    fn add_trims_description() {
        let mut store = ExpenseStore::new();
        let id = ExpenseService::add(&mut store, sample(3.5)).unwrap();
        assert_eq!(store.get(id).unwrap().description, "Coffee");
    }

    #[test]
    fn add_rejects_non_positive_amounts() {
        let mut store = ExpenseStore::new();
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = ExpenseService::add(&mut store, sample(amount))
                .expect_err("non-positive amount must fail");
            assert!(
                matches!(err, ServiceError::Invalid(ref message) if message.contains("greater than 0")),
                "unexpected error: {err:?}"
            );
        }
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_amounts_the_currency_cannot_hold() {
        let mut store = ExpenseStore::new();
        let cases = [
            (1e17, "cannot exceed"),
            (0.001, "at most 2 decimal places"),
            (3.555, "at most 2 decimal places"),
        ];
        for (amount, expected) in cases {
            let err = ExpenseService::add(&mut store, sample(amount))
                .expect_err("out-of-range amount must fail");
            assert!(
                matches!(err, ServiceError::Invalid(ref message) if message.contains(expected)),
                "{amount}: unexpected error: {err:?}"
            );
        }
        assert!(store.is_empty());
        ExpenseService::add(&mut store, sample(1_000_000_000.0)).unwrap();
    }

    #[test]
    fn remove_fails_for_missing_expense() {
        let mut store = ExpenseStore::new();
        let err = ExpenseService::remove(&mut store, ExpenseId(99))
            .expect_err("remove must fail for unknown id");
        assert!(
            matches!(err, ServiceError::Tracker(TrackerError::ExpenseNotFound(ExpenseId(99)))),
            "unexpected error: {err:?}"
        );
    }
}
