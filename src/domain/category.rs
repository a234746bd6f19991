//! Closed set of expense categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// Classification label attached to every expense.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Category {
    #[default]
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Other,
}

impl Category {
    /// All categories in presentation order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Shopping,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|category| category.label()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = TrackerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                TrackerError::InvalidInput(format!(
                    "unknown category `{}` (options: {})",
                    needle,
                    Self::labels().join(", ")
                ))
            })
    }
}
