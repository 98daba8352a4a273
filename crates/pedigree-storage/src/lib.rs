//! Pedigree Storage - Storage backends for the horse registry
//!
//! This crate provides the storage backends that persist horses and
//! owners, and the registry service that validates writes before they
//! reach a backend.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod migration;
pub mod registry;
pub mod sample;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod memory;

pub use error::{StorageError, StorageResult};
pub use migration::{Migratable, SchemaVersion, CURRENT_VERSION};
pub use registry::Registry;
pub use sample::{load_sample_data, sample_data, SampleData};
pub use traits::StorageBackend;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

pub use memory::MemoryStorage;
