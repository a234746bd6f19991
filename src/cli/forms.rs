//! Expense entry form: a text draft, field validators, and submit/reset.
//!
//! The draft keeps raw text exactly as typed. Nothing is checked while fields
//! are edited; `submit` validates every field at once, emits a normalized
//! [`ExpenseData`] payload and resets the draft to fresh defaults.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::core::time::Clock;
use crate::currency::validate_amount;
use crate::domain::{Category, ExpenseData};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Editable fields of the expense form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Description,
    Amount,
    Category,
    Date,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Description,
        FormField::Amount,
        FormField::Category,
        FormField::Date,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FormField::Description => "description",
            FormField::Amount => "amount",
            FormField::Category => "category",
            FormField::Date => "date",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Description => "Description *",
            FormField::Amount => "Amount *",
            FormField::Category => "Category",
            FormField::Date => "Date",
        }
    }

    fn validator(self, precision: u8) -> Validator {
        match self {
            FormField::Description => Validator::NonEmpty,
            FormField::Amount => Validator::Amount { precision },
            FormField::Category => Validator::OneOf(
                Category::labels().into_iter().map(String::from).collect(),
            ),
            FormField::Date => Validator::Date,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim().to_ascii_lowercase();
        FormField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == needle)
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "unknown field `{}` (fields: description, amount, category, date)",
                    input.trim()
                ))
            })
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Built-in validation helpers.
#[derive(Debug, Clone)]
enum Validator {
    NonEmpty,
    /// Positive, bounded, and exact in `precision` decimal places.
    Amount { precision: u8 },
    Date,
    OneOf(Vec<String>),
}

impl Validator {
    /// Returns the normalized text on success.
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let trimmed = input.trim();
        match self {
            Validator::NonEmpty => {
                if trimmed.is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Validator::Amount { precision } => {
                if trimmed.is_empty() {
                    return Err(ValidationError::new("Amount is required"));
                }
                let value = trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| ValidationError::new("Enter a numeric amount (e.g., 3.50)"))?;
                validate_amount(value, *precision)
                    .map(|()| value.to_string())
                    .map_err(|err| ValidationError::new(err.to_string()))
            }
            Validator::Date => {
                if trimmed.is_empty() {
                    return Err(ValidationError::new("Date is required (use YYYY-MM-DD)"));
                }
                NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                    .map(|date| date.format(DATE_FORMAT).to_string())
                    .map_err(|_| ValidationError::new("Use YYYY-MM-DD format"))
            }
            Validator::OneOf(options) => options
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
                .cloned()
                .ok_or_else(|| {
                    ValidationError::new(format!("Value must be one of: {}", options.join(", ")))
                }),
        }
    }
}

/// One failed field in a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Submit rejection listing every invalid field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.errors))]
pub struct FormError {
    pub errors: Vec<FieldError>,
}

impl FormError {
    pub fn has_error(&self, field: FormField) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw text of every form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl ExpenseDraft {
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            category: Category::default().label().to_string(),
            date: today.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Description => &self.description,
            FormField::Amount => &self.amount,
            FormField::Category => &self.category,
            FormField::Date => &self.date,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Description => &mut self.description,
            FormField::Amount => &mut self.amount,
            FormField::Category => &mut self.category,
            FormField::Date => &mut self.date,
        }
    }
}

/// Form state owner. Emits [`ExpenseData`] on a successful submit.
pub struct ExpenseForm {
    draft: ExpenseDraft,
    clock: Arc<dyn Clock>,
    precision: u8,
}

impl ExpenseForm {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let draft = ExpenseDraft::with_defaults(clock.today());
        Self {
            draft,
            clock,
            precision: 2,
        }
    }

    /// A blank form with the same clock and amount precision. Used for
    /// one-shot entry so the interactive draft is left alone.
    pub fn detached(&self) -> Self {
        Self {
            draft: ExpenseDraft::with_defaults(self.clock.today()),
            clock: Arc::clone(&self.clock),
            precision: self.precision,
        }
    }

    /// Decimal places an amount may carry (the currency's minor units).
    pub fn set_precision(&mut self, precision: u8) {
        self.precision = precision;
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    /// Replaces one field of the draft; no validation happens here.
    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.draft.field_mut(field) = value.into();
    }

    /// Validates the draft. On success the payload is returned and the draft
    /// is reset; on failure the draft is left as typed.
    pub fn submit(&mut self) -> Result<ExpenseData, FormError> {
        let data = self.validate()?;
        self.reset();
        Ok(data)
    }

    /// Restores defaults, reading the current date at reset time.
    pub fn reset(&mut self) {
        self.draft = ExpenseDraft::with_defaults(self.clock.today());
    }

    fn validate(&self) -> Result<ExpenseData, FormError> {
        let mut errors = Vec::new();
        let mut values = Vec::with_capacity(FormField::ALL.len());
        for field in FormField::ALL {
            match field.validator(self.precision).validate(self.draft.field(field)) {
                Ok(value) => values.push(value),
                Err(err) => errors.push(FieldError {
                    field,
                    message: err.message,
                }),
            }
        }
        if !errors.is_empty() {
            debug!(fields = errors.len(), "expense form rejected");
            return Err(FormError { errors });
        }

        let invalid = |field: FormField, message: &str| FormError {
            errors: vec![FieldError {
                field,
                message: message.to_string(),
            }],
        };
        let amount = values[1]
            .parse::<f64>()
            .map_err(|_| invalid(FormField::Amount, "Enter a numeric amount (e.g., 3.50)"))?;
        let category = values[2]
            .parse::<Category>()
            .map_err(|err| invalid(FormField::Category, &err.to_string()))?;
        let date = NaiveDate::parse_from_str(&values[3], DATE_FORMAT)
            .map_err(|_| invalid(FormField::Date, "Use YYYY-MM-DD format"))?;

        Ok(ExpenseData {
            description: values[0].clone(),
            amount,
            category,
            date,
        })
    }
}
