//! Query types for searching horses and owners

use crate::horse::{Horse, Sex};
use crate::owner::Owner;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Horse search builder
///
/// All filters are optional and combined with AND. Text filters are
/// case-insensitive substring matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HorseSearch {
    /// Substring of the horse name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Substring of the description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Only horses born on or before this date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub born_before: Option<NaiveDate>,

    /// Only horses of this sex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,

    /// Substring of the owner's "first last" name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,

    /// Maximum results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl HorseSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn born_before(mut self, date: NaiveDate) -> Self {
        self.born_before = Some(date);
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn with_owner_name(mut self, owner_name: impl Into<String>) -> Self {
        self.owner_name = Some(owner_name.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether the search needs owners resolved to be evaluated
    pub fn needs_owner(&self) -> bool {
        self.owner_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Evaluate the filters against a horse and its owner
    pub fn matches(&self, horse: &Horse, owner: Option<&Owner>) -> bool {
        if !contains_ci(Some(&horse.name), self.name.as_deref()) {
            return false;
        }
        if !contains_ci(horse.description.as_deref(), self.description.as_deref()) {
            return false;
        }
        if let Some(sex) = self.sex {
            if horse.sex != sex {
                return false;
            }
        }
        if let Some(date) = self.born_before {
            if horse.date_of_birth > date {
                return false;
            }
        }
        if self.needs_owner() {
            let full = owner.map(Owner::full_name);
            if !contains_ci(full.as_deref(), self.owner_name.as_deref()) {
                return false;
            }
        }
        true
    }
}

/// Owner search builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerSearch {
    /// Substring of the owner's "first last" name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Maximum results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl OwnerSearch {
    pub fn matches(&self, owner: &Owner) -> bool {
        contains_ci(Some(&owner.full_name()), self.name.as_deref())
    }
}

// An empty or absent needle matches everything; an absent haystack only
// matches an empty needle.
fn contains_ci(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(n) if n.is_empty() => true,
        Some(n) => haystack.is_some_and(|h| h.to_lowercase().contains(&n.to_lowercase())),
    }
}
