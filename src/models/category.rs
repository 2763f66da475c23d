//! Spending and income categories
//!
//! The ledger uses a fixed set of categories. They are stored in lowercase
//! and can be parsed from their English names or a few common aliases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed transaction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Groceries,
    Housing,
    Transport,
    Leisure,
    Bills,
    Salary,
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 7] = [
        Category::Groceries,
        Category::Housing,
        Category::Transport,
        Category::Leisure,
        Category::Bills,
        Category::Salary,
        Category::Other,
    ];

    /// Lowercase storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Housing => "housing",
            Self::Transport => "transport",
            Self::Leisure => "leisure",
            Self::Bills => "bills",
            Self::Salary => "salary",
            Self::Other => "other",
        }
    }

    /// Whether a monthly spending goal makes sense for this category
    ///
    /// Salary is an income category and never carries a goal.
    pub fn accepts_goal(&self) -> bool {
        !matches!(self, Self::Salary)
    }

    /// Categories that can carry a budget goal
    pub fn goal_categories() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|c| c.accepts_goal())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Groceries => "Groceries",
            Self::Housing => "Housing",
            Self::Transport => "Transport",
            Self::Leisure => "Leisure",
            Self::Bills => "Bills",
            Self::Salary => "Salary",
            Self::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

/// Error returned when a category name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown category '{}'. Use one of: groceries, housing, transport, leisure, bills, salary, other",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groceries" | "grocery" | "food" | "market" => Ok(Self::Groceries),
            "housing" | "home" | "rent" => Ok(Self::Housing),
            "transport" | "transportation" | "car" => Ok(Self::Transport),
            "leisure" | "fun" | "entertainment" => Ok(Self::Leisure),
            "bills" | "bill" | "utilities" => Ok(Self::Bills),
            "salary" | "income" | "wages" => Ok(Self::Salary),
            "other" | "others" | "misc" => Ok(Self::Other),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("Groceries".parse::<Category>().unwrap(), Category::Groceries);
        assert_eq!(" rent ".parse::<Category>().unwrap(), Category::Housing);
        assert_eq!("utilities".parse::<Category>().unwrap(), Category::Bills);
        assert!("pets".parse::<Category>().is_err());
    }

    #[test]
    fn test_round_trip_through_storage_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_goal_categories_exclude_salary() {
        let goals: Vec<_> = Category::goal_categories().collect();
        assert_eq!(goals.len(), 6);
        assert!(!goals.contains(&Category::Salary));
    }

    #[test]
    fn test_serialization_is_lowercase() {
        let json = serde_json::to_string(&Category::Leisure).unwrap();
        assert_eq!(json, "\"leisure\"");
    }
}
