//! Pedigree Core - Graph engine for the horse registry
//!
//! This crate provides the data types, the lineage validator and the
//! ancestry resolver for the pedigree registry.

pub mod ancestry;
pub mod error;
pub mod horse;
pub mod limits;
pub mod owner;
pub mod query;
pub mod registry;
pub mod validator;

pub use ancestry::{AncestorRecord, AncestryQuery, AncestryResolver, AncestryTree, TraversalStats};
pub use error::{Error, ErrorKind, Result};
pub use horse::{Horse, HorseDetail, HorseDraft, HorseId, HorseInput, HorseListItem, NewHorse, Sex};
pub use owner::{NewOwner, Owner, OwnerId, OwnerValidator};
pub use query::{HorseSearch, OwnerSearch};
pub use registry::PedigreeRegistry;
pub use validator::{LineageValidator, ValidationContext, ValidationMode, ValidationReport};
