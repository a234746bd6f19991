use thiserror::Error;

use crate::domain::ExpenseId;

/// Error type that captures expense tracker failures outside the shell.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

/// User-facing shell error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}
