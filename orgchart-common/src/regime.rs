//! Employment-regime filter applied before any hierarchy computation
//!
//! Filtering happens upstream of subordinate lookups, so a filtered-out
//! manager's reports vanish from the view instead of re-attaching to the
//! next visible ancestor.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{EmploymentType, Person};

/// Working-set filter by employment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "regime", rename_all = "snake_case")]
pub enum RegimeFilter {
    #[default]
    All,
    Only(EmploymentType),
}

impl RegimeFilter {
    /// Parse a UI tag. `All`, `Todos` and the empty string mean no filtering.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("todos")
        {
            return Ok(RegimeFilter::All);
        }
        EmploymentType::parse(trimmed)
            .map(RegimeFilter::Only)
            .ok_or_else(|| Error::ValidationFailed(format!("Unknown regime tag: {}", tag)))
    }

    pub fn matches(&self, person: &Person) -> bool {
        match self {
            RegimeFilter::All => true,
            RegimeFilter::Only(wanted) => person.employment_type == Some(*wanted),
        }
    }

    /// Filtered copy of `people`, preserving order
    pub fn apply(&self, people: &[Person]) -> Vec<Person> {
        match self {
            RegimeFilter::All => people.to_vec(),
            RegimeFilter::Only(_) => people.iter().filter(|p| self.matches(p)).cloned().collect(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            RegimeFilter::All => "All",
            RegimeFilter::Only(t) => t.as_str(),
        }
    }
}
