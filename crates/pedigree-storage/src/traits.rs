//! Storage backend trait definitions

use crate::error::StorageResult;
use async_trait::async_trait;
use pedigree_core::{
    AncestorRecord, AncestryQuery, AncestryResolver, Horse, HorseId, NewHorse, NewOwner, Owner,
    OwnerId,
};

/// Trait for storage backend implementations
///
/// Backends hold no lineage rules; they persist what the registry hands
/// them after validation.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn initialize(&self) -> StorageResult<()>;

    /// Close the storage connection
    async fn close(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Horse Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get every stored horse. Never returns a partial result.
    async fn get_all_horses(&self) -> StorageResult<Vec<Horse>>;

    /// Get a horse by id
    ///
    /// Fails with `HorseNotFound` if absent and `DuplicateHorse` if the id
    /// matches more than one record.
    async fn get_horse(&self, id: HorseId) -> StorageResult<Horse>;

    /// Persist a new horse and assign it an id
    async fn create_horse(&self, horse: &NewHorse) -> StorageResult<Horse>;

    /// Replace the stored horse with the same id
    async fn update_horse(&self, horse: &Horse) -> StorageResult<Horse>;

    /// Delete a horse. Deleting an unknown id is not an error.
    async fn delete_horse(&self, id: HorseId) -> StorageResult<()>;

    /// Insert a horse with an explicit id, bypassing id assignment
    async fn insert_horse(&self, horse: &Horse) -> StorageResult<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Owner Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist a new owner and assign it an id
    async fn create_owner(&self, owner: &NewOwner) -> StorageResult<Owner>;

    /// Insert an owner with an explicit id
    async fn insert_owner(&self, owner: &Owner) -> StorageResult<()>;

    /// Get an owner by id
    async fn get_owner(&self, id: OwnerId) -> StorageResult<Owner>;

    /// Get the owners among `ids` that exist
    async fn get_owners(&self, ids: &[OwnerId]) -> StorageResult<Vec<Owner>>;

    /// Get all owners
    async fn get_all_owners(&self) -> StorageResult<Vec<Owner>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve the ancestry of a horse over the current snapshot
    async fn ancestors(&self, query: &AncestryQuery) -> StorageResult<Vec<AncestorRecord>> {
        let horses = self.get_all_horses().await?;
        Ok(AncestryResolver::resolve(query, &horses))
    }
}
