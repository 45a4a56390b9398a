//! Search and category filtering for the trade table.

use super::error::JournalError;
use super::trade::{Direction, TradeRecord};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Winning,
    Losing,
    Long,
    Short,
}

impl Category {
    pub fn matches(&self, record: &TradeRecord) -> bool {
        match self {
            Category::All => true,
            Category::Winning => record.is_win(),
            Category::Losing => !record.is_win(),
            Category::Long => record.direction == Direction::Long,
            Category::Short => record.direction == Direction::Short,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::All => "all",
            Category::Winning => "winning",
            Category::Losing => "losing",
            Category::Long => "long",
            Category::Short => "short",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Category::All),
            "winning" => Ok(Category::Winning),
            "losing" => Ok(Category::Losing),
            "long" => Ok(Category::Long),
            "short" => Ok(Category::Short),
            _ => Err(JournalError::InvalidCategory {
                value: s.to_string(),
            }),
        }
    }
}

/// Case-insensitive substring match against symbol or notes. An empty term
/// matches everything.
pub fn matches_search(record: &TradeRecord, term: &str) -> bool {
    let needle = term.to_lowercase();
    record.symbol.to_lowercase().contains(&needle) || record.notes.to_lowercase().contains(&needle)
}

/// Records matching both the search term and the category, most recent first.
/// The sort is stable, so equal dates keep their ledger order.
pub fn query<'a>(records: &'a [TradeRecord], term: &str, category: Category) -> Vec<&'a TradeRecord> {
    let mut rows: Vec<&TradeRecord> = records
        .iter()
        .filter(|r| matches_search(r, term) && category.matches(r))
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}
