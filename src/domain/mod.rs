pub mod category;
pub mod common;
pub mod expense;

pub use category::Category;
pub use common::{Amounted, BelongsToCategory, Displayable, Identifiable};
pub use expense::{Expense, ExpenseData, ExpenseId};
