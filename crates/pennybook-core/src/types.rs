//! Basic types for the core ledger module

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Record category; the ledger knows exactly these two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Money coming in (salary, gifts, refunds)
    Income,
    /// Money going out
    Expense,
}

impl Category {
    /// Text stored in the category column
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "Income",
            Category::Expense => "Expense",
        }
    }

    /// Exact match on stored text; anything else is not a ledger category
    pub fn from_stored(text: &str) -> Option<Self> {
        match text {
            "Income" => Some(Category::Income),
            "Expense" => Some(Category::Expense),
            _ => None,
        }
    }
}

impl std::str::FromStr for Category {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Category::Income),
            "expense" => Ok(Category::Expense),
            _ => Err(CoreError::ValidationError {
                message: format!("Invalid category '{}', expected Income or Expense", s),
            }),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
