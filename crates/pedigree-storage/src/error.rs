//! Storage error types

use pedigree_core::{HorseId, OwnerId};
use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("No horse with ID {0} found")]
    HorseNotFound(HorseId),

    #[error("Owner with ID {0} not found")]
    OwnerNotFound(OwnerId),

    #[error("Too many horses with ID {0} found")]
    DuplicateHorse(HorseId),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] ::rusqlite::Error),
}

impl From<StorageError> for pedigree_core::Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::HorseNotFound(id) => pedigree_core::Error::HorseNotFound(id),
            StorageError::OwnerNotFound(id) => pedigree_core::Error::OwnerNotFound(id),
            other => {
                let message = match &other {
                    StorageError::DuplicateHorse(_) | StorageError::Corrupt(_) => {
                        "Internal consistency violation in horse storage"
                    }
                    _ => "Internal error occurred while accessing storage",
                };
                pedigree_core::Error::fatal_with(message, other)
            }
        }
    }
}
