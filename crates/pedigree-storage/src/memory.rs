//! In-memory storage backend for testing

use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use pedigree_core::{Horse, HorseId, NewHorse, NewOwner, Owner, OwnerId};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory storage backend
///
/// Useful for testing and temporary storage. Ids are assigned as one past
/// the highest positive id in use, so negative seed ids never collide.
pub struct MemoryStorage {
    horses: RwLock<BTreeMap<HorseId, Horse>>,
    owners: RwLock<BTreeMap<OwnerId, Owner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            horses: RwLock::new(BTreeMap::new()),
            owners: RwLock::new(BTreeMap::new()),
        }
    }

    fn horses_read(&self) -> StorageResult<RwLockReadGuard<'_, BTreeMap<HorseId, Horse>>> {
        self.horses
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }

    fn horses_write(&self) -> StorageResult<RwLockWriteGuard<'_, BTreeMap<HorseId, Horse>>> {
        self.horses
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }

    fn owners_read(&self) -> StorageResult<RwLockReadGuard<'_, BTreeMap<OwnerId, Owner>>> {
        self.owners
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }

    fn owners_write(&self) -> StorageResult<RwLockWriteGuard<'_, BTreeMap<OwnerId, Owner>>> {
        self.owners
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

// One past the highest id in use, never below 1
fn next_id(highest: Option<i64>) -> i64 {
    highest.unwrap_or(0).max(0) + 1
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }

    // Horse operations

    async fn get_all_horses(&self) -> StorageResult<Vec<Horse>> {
        let horses = self.horses_read()?;
        Ok(horses.values().cloned().collect())
    }

    async fn get_horse(&self, id: HorseId) -> StorageResult<Horse> {
        let horses = self.horses_read()?;
        horses
            .get(&id)
            .cloned()
            .ok_or(StorageError::HorseNotFound(id))
    }

    async fn create_horse(&self, horse: &NewHorse) -> StorageResult<Horse> {
        let mut horses = self.horses_write()?;
        let id = HorseId(next_id(horses.keys().next_back().map(|k| k.0)));
        let created = horse.clone().into_horse(id);
        horses.insert(id, created.clone());
        Ok(created)
    }

    async fn update_horse(&self, horse: &Horse) -> StorageResult<Horse> {
        let mut horses = self.horses_write()?;
        match horses.get_mut(&horse.id) {
            Some(stored) => {
                *stored = horse.clone();
                Ok(horse.clone())
            }
            None => Err(StorageError::HorseNotFound(horse.id)),
        }
    }

    async fn delete_horse(&self, id: HorseId) -> StorageResult<()> {
        let mut horses = self.horses_write()?;
        horses.remove(&id);
        Ok(())
    }

    async fn insert_horse(&self, horse: &Horse) -> StorageResult<()> {
        let mut horses = self.horses_write()?;
        horses.insert(horse.id, horse.clone());
        Ok(())
    }

    // Owner operations

    async fn create_owner(&self, owner: &NewOwner) -> StorageResult<Owner> {
        let mut owners = self.owners_write()?;
        let id = OwnerId(next_id(owners.keys().next_back().map(|k| k.0)));
        let created = owner.clone().into_owner(id);
        owners.insert(id, created.clone());
        Ok(created)
    }

    async fn insert_owner(&self, owner: &Owner) -> StorageResult<()> {
        let mut owners = self.owners_write()?;
        owners.insert(owner.id, owner.clone());
        Ok(())
    }

    async fn get_owner(&self, id: OwnerId) -> StorageResult<Owner> {
        let owners = self.owners_read()?;
        owners
            .get(&id)
            .cloned()
            .ok_or(StorageError::OwnerNotFound(id))
    }

    async fn get_owners(&self, ids: &[OwnerId]) -> StorageResult<Vec<Owner>> {
        let owners = self.owners_read()?;
        Ok(ids.iter().filter_map(|id| owners.get(id).cloned()).collect())
    }

    async fn get_all_owners(&self) -> StorageResult<Vec<Owner>> {
        let owners = self.owners_read()?;
        Ok(owners.values().cloned().collect())
    }
}
