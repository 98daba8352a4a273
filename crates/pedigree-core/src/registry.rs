//! Pedigree registry trait definition

use crate::ancestry::{AncestorRecord, AncestryQuery};
use crate::error::Result;
use crate::horse::{HorseDetail, HorseId, HorseInput, HorseListItem, Sex};
use crate::owner::{NewOwner, Owner, OwnerId};
use crate::query::{HorseSearch, OwnerSearch};
use async_trait::async_trait;
use std::collections::HashMap;

/// Main trait for registry operations
///
/// This is the surface the request layer talks to. Implementations resolve
/// parent references, run the lineage validator and persist through a
/// storage backend.
#[async_trait]
pub trait PedigreeRegistry: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Horse Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate and create a horse, returning its resolved detail
    async fn create_horse(&self, input: HorseInput) -> Result<HorseDetail>;

    /// Validate and replace the horse with the given id
    async fn update_horse(&self, id: HorseId, input: HorseInput) -> Result<HorseDetail>;

    /// Get a horse with owner and one level of parent detail
    async fn get_horse(&self, id: HorseId) -> Result<HorseDetail>;

    /// Delete a horse; fails with not-found if it does not exist
    async fn delete_horse(&self, id: HorseId) -> Result<()>;

    /// List horses matching a search, with owners resolved
    async fn list_horses(&self, search: &HorseSearch) -> Result<Vec<HorseListItem>>;

    /// Suggest horses that could fill a parent slot of the given sex
    async fn parent_candidates(
        &self,
        name: Option<&str>,
        sex: Sex,
        limit: usize,
    ) -> Result<Vec<HorseListItem>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Pedigree Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Flat ancestor sequence ordered by path signature
    async fn family_tree(&self, query: &AncestryQuery) -> Result<Vec<AncestorRecord>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Owner Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate and create an owner
    async fn create_owner(&self, owner: NewOwner) -> Result<Owner>;

    /// Get an owner by id
    async fn get_owner(&self, id: OwnerId) -> Result<Owner>;

    /// Batch lookup; fails with not-found if any id is missing
    async fn get_owners(&self, ids: &[OwnerId]) -> Result<HashMap<OwnerId, Owner>>;

    /// Search owners by name
    async fn search_owners(&self, search: &OwnerSearch) -> Result<Vec<Owner>>;
}
