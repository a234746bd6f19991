use super::{Category, ExpenseId};

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> ExpenseId;
}

/// Exposes the monetary amount carried by an entry, in currency units.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Entries that are classified under a single category.
pub trait BelongsToCategory {
    fn category(&self) -> Category;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
