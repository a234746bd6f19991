//! Domain types representing recorded expenses.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::common::*;
use crate::errors::TrackerError;

/// Identifier assigned to an expense when it enters the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ExpenseId(pub u64);

impl ExpenseId {
    pub fn value(self) -> u64 {
        self.0
    }

    /// The id after this one; fails once the id space is used up.
    pub fn next(self) -> Result<Self, TrackerError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| TrackerError::InvalidInput("expense id space exhausted".into()))
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExpenseId {
    type Err = TrackerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim().trim_start_matches('#');
        trimmed
            .parse::<u64>()
            .map(ExpenseId)
            .map_err(|_| TrackerError::InvalidInput(format!("invalid expense id `{}`", input)))
    }
}

/// Normalized payload emitted by the expense form; everything but the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseData {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

impl ExpenseData {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category,
            date,
        }
    }
}

/// One recorded spending entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

impl Expense {
    pub fn from_data(id: ExpenseId, data: ExpenseData) -> Self {
        Self {
            id,
            description: data.description,
            amount: data.amount,
            category: data.category,
            date: data.date,
        }
    }
}

impl Identifiable for Expense {
    fn id(&self) -> ExpenseId {
        self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl BelongsToCategory for Expense {
    fn category(&self) -> Category {
        self.category
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("#{} {} [{}]", self.id, self.description, self.category)
    }
}
