//! Owner types and create validation

use crate::error::{Error, Result};
use crate::limits::{MAX_EMAIL_LEN, MAX_OWNER_NAME_LEN};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Unique identifier for an owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OwnerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A horse owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Owner {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data for creating a new owner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOwner {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl NewOwner {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn into_owner(self, id: OwnerId) -> Owner {
        Owner {
            id,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email,
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,6}$")
            .expect("email pattern is a valid regex")
    })
}

/// Validates owners before they are created
pub struct OwnerValidator;

impl OwnerValidator {
    /// Check a new owner against field rules and email uniqueness.
    ///
    /// All failures are collected into a single `Error::Validation`.
    pub fn validate_for_create(owner: &NewOwner, existing: &[Owner]) -> Result<()> {
        tracing::trace!("validate_for_create({:?})", owner);
        let mut errors = Vec::new();

        check_name(owner.first_name.as_deref(), "first", &mut errors);
        check_name(owner.last_name.as_deref(), "last", &mut errors);

        if let Some(email) = &owner.email {
            if email.trim().is_empty() {
                errors.push("Owner email is given but blank".to_string());
            } else if email.chars().count() > MAX_EMAIL_LEN {
                errors.push(format!(
                    "Owner email too long: longer than {} characters",
                    MAX_EMAIL_LEN
                ));
            } else if !email_regex().is_match(email) {
                errors.push("Owner email is invalid. Please provide a valid email".to_string());
            } else if existing.iter().any(|o| o.email.as_deref() == Some(email.as_str())) {
                errors.push("Email is already used. Please provide another email".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!("Owner rejected with {} validation errors", errors.len());
            Err(Error::validation("Validation of owner to create failed", errors))
        }
    }
}

fn check_name(name: Option<&str>, which: &str, errors: &mut Vec<String>) {
    match name {
        None => errors.push(format!("Owner {} name cannot be empty", which)),
        Some(n) if n.trim().is_empty() => errors.push(format!("Owner {} name cannot be empty", which)),
        Some(n) if n.chars().count() > MAX_OWNER_NAME_LEN => errors.push(format!(
            "Owner {} name must be shorter than {} characters",
            which, MAX_OWNER_NAME_LEN
        )),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_valid_owner_passes() {
        let owner = NewOwner::new("Anna", "Huber").with_email("anna@stable.at");
        assert!(OwnerValidator::validate_for_create(&owner, &[]).is_ok());
    }

    #[test]
    fn test_collects_all_failures() {
        let owner = NewOwner {
            first_name: None,
            last_name: Some("x".repeat(150)),
            email: Some("not-an-email".into()),
        };

        let err = OwnerValidator::validate_for_create(&owner, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.errors().len(), 3);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let existing = vec![NewOwner::new("Anna", "Huber")
            .with_email("anna@stable.at")
            .into_owner(OwnerId(1))];
        let owner = NewOwner::new("Berta", "Huber").with_email("anna@stable.at");

        let err = OwnerValidator::validate_for_create(&owner, &existing).unwrap_err();
        assert!(err.errors()[0].contains("already used"));
    }
}
