pub mod expense_service;
pub mod filter_service;
pub mod summary_service;

pub use expense_service::ExpenseService;
pub use filter_service::{
    CategoryFilter, ExpenseListState, FilterService, FilteredExpenses, ListStatus,
};
pub use summary_service::{CategoryBreakdown, ExpenseSummary, SummaryService};

use crate::errors::TrackerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("{0}")]
    Invalid(String),
}
