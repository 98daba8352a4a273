//! Error types for Pedigree Core

use crate::horse::HorseId;
use crate::owner::OwnerId;
use thiserror::Error;

/// Result type alias using Pedigree's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause kept on fatal errors for diagnostics
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed client data
    Validation,
    /// Well-formed data that violates a lineage invariant
    Conflict,
    /// A referenced, root or target id is absent
    NotFound,
    /// Malformed query input such as a negative generation count
    InvalidInput,
    /// Storage unreachable or internal inconsistency
    Fatal,
}

/// Pedigree error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", render_list(summary, "Validation errors", errors))]
    Validation { summary: String, errors: Vec<String> },

    #[error("{}", render_list(summary, "Conflicts", errors))]
    Conflict { summary: String, errors: Vec<String> },

    #[error("No horse with ID {0} found")]
    HorseNotFound(HorseId),

    #[error("Owner with ID {0} not found")]
    OwnerNotFound(OwnerId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fatal error: {message}")]
    Fatal {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

fn render_list(summary: &str, descriptor: &str, errors: &[String]) -> String {
    format!("{}. {}: {}.", summary, descriptor, errors.join(", "))
}

impl Error {
    pub fn validation(summary: impl Into<String>, errors: Vec<String>) -> Self {
        Self::Validation {
            summary: summary.into(),
            errors,
        }
    }

    pub fn conflict(summary: impl Into<String>, errors: Vec<String>) -> Self {
        Self::Conflict {
            summary: summary.into(),
            errors,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
            source: None,
        }
    }

    pub fn fatal_with(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        Self::Fatal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::HorseNotFound(_) | Self::OwnerNotFound(_) => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Fatal { .. } => ErrorKind::Fatal,
        }
    }

    /// Summary line for list-carrying errors, the full message otherwise
    pub fn summary(&self) -> String {
        match self {
            Self::Validation { summary, .. } | Self::Conflict { summary, .. } => summary.clone(),
            other => other.to_string(),
        }
    }

    /// Individual failures, empty for errors that carry no list
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Validation { errors, .. } | Self::Conflict { errors, .. } => errors,
            _ => &[],
        }
    }
}
