//! Registry service over a storage backend

use crate::error::StorageError;
use crate::traits::StorageBackend;
use async_trait::async_trait;
use chrono::NaiveDate;
use pedigree_core::{
    AncestorRecord, AncestryQuery, Error, Horse, HorseDetail, HorseDraft, HorseId, HorseInput,
    HorseListItem, HorseSearch, LineageValidator, NewOwner, Owner, OwnerId, OwnerSearch,
    OwnerValidator, PedigreeRegistry, Result, Sex,
};
use std::collections::{BTreeSet, HashMap};

/// Registry implementation backed by a [`StorageBackend`]
///
/// Parent references are resolved into snapshots before validation. The
/// validate-then-persist sequence is not isolated from concurrent writers.
pub struct Registry<S> {
    storage: S,
    today: Option<NaiveDate>,
}

impl<S: StorageBackend> Registry<S> {
    pub fn new(storage: S) -> Self {
        Self { storage, today: None }
    }

    /// Pin the validation date instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn validator(&self) -> LineageValidator {
        match self.today {
            Some(today) => LineageValidator::at(today),
            None => LineageValidator::new(),
        }
    }

    async fn require_horse(&self, id: HorseId) -> Result<Horse> {
        Ok(self.storage.get_horse(id).await?)
    }

    async fn require_owner(&self, id: OwnerId) -> Result<Owner> {
        Ok(self.storage.get_owner(id).await?)
    }

    /// Turn a request into a draft with parent snapshots embedded
    async fn resolve_draft(&self, input: HorseInput) -> Result<HorseDraft> {
        let mother = match input.mother_id {
            Some(id) => Some(self.require_horse(id).await?),
            None => None,
        };
        let father = match input.father_id {
            Some(id) => Some(self.require_horse(id).await?),
            None => None,
        };
        if let Some(owner_id) = input.owner_id {
            self.require_owner(owner_id).await?;
        }

        Ok(HorseDraft {
            id: input.id,
            name: input.name,
            description: input.description,
            date_of_birth: input.date_of_birth,
            sex: input.sex,
            owner_id: input.owner_id,
            mother,
            father,
        })
    }

    /// Owner of an already persisted horse; a dangling reference is fatal
    async fn owner_of(&self, horse: &Horse) -> Result<Option<Owner>> {
        let Some(owner_id) = horse.owner_id else {
            return Ok(None);
        };
        match self.storage.get_owner(owner_id).await {
            Ok(owner) => Ok(Some(owner)),
            Err(StorageError::OwnerNotFound(_)) => Err(Error::fatal(format!(
                "Horse {} references owner {} which does not exist",
                horse.id, owner_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// One level of parent detail; stale parent ids are left out
    async fn parent_detail(&self, child: &Horse, parent: Option<HorseId>) -> Result<Option<Box<HorseDetail>>> {
        let Some(parent_id) = parent else {
            return Ok(None);
        };
        match self.storage.get_horse(parent_id).await {
            Ok(parent) => {
                let owner = self.owner_of(&parent).await?;
                Ok(Some(Box::new(HorseDetail::leaf(parent, owner))))
            }
            Err(StorageError::HorseNotFound(_)) => {
                tracing::warn!(
                    "Horse {} references missing parent {}",
                    child.id,
                    parent_id
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn detail(&self, horse: Horse) -> Result<HorseDetail> {
        let owner = self.owner_of(&horse).await?;
        let mother = self.parent_detail(&horse, horse.mother_id).await?;
        let father = self.parent_detail(&horse, horse.father_id).await?;
        Ok(HorseDetail {
            horse,
            owner,
            mother,
            father,
        })
    }
}

#[async_trait]
impl<S: StorageBackend> PedigreeRegistry for Registry<S> {
    async fn create_horse(&self, input: HorseInput) -> Result<HorseDetail> {
        tracing::debug!("create_horse({:?})", input);

        // Ids are assigned by the store
        let input = HorseInput { id: None, ..input };
        let draft = self.resolve_draft(input).await?;
        self.validator().validate_for_create(&draft)?;

        let created = self.storage.create_horse(&draft.to_new_horse()?).await?;
        tracing::info!("Created horse '{}' with id {}", created.name, created.id);

        self.detail(created).await
    }

    async fn update_horse(&self, id: HorseId, input: HorseInput) -> Result<HorseDetail> {
        tracing::debug!("update_horse({}, {:?})", id, input);

        self.require_horse(id).await?;
        let input = HorseInput { id: Some(id), ..input };
        let draft = self.resolve_draft(input).await?;

        let existing = self.storage.get_all_horses().await?;
        self.validator().validate_for_update(&draft, &existing)?;

        let horse = draft.to_new_horse()?.into_horse(id);
        let updated = self.storage.update_horse(&horse).await?;
        tracing::info!("Updated horse '{}' ({})", updated.name, updated.id);

        self.detail(updated).await
    }

    async fn get_horse(&self, id: HorseId) -> Result<HorseDetail> {
        tracing::debug!("get_horse({})", id);
        let horse = self.require_horse(id).await?;
        self.detail(horse).await
    }

    async fn delete_horse(&self, id: HorseId) -> Result<()> {
        tracing::debug!("delete_horse({})", id);

        // Check-then-act, not transactional
        self.require_horse(id).await?;
        self.storage.delete_horse(id).await?;
        tracing::info!("Deleted horse {}", id);
        Ok(())
    }

    async fn list_horses(&self, search: &HorseSearch) -> Result<Vec<HorseListItem>> {
        tracing::debug!("list_horses({:?})", search);

        let mut search = search.clone();
        if search.born_before.is_none() {
            search.born_before = Some(self.validator().today());
        }

        let horses = self.storage.get_all_horses().await?;
        let owner_ids: Vec<OwnerId> = horses
            .iter()
            .filter_map(|h| h.owner_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let owners: HashMap<OwnerId, Owner> = self
            .storage
            .get_owners(&owner_ids)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        let mut items = Vec::new();
        for horse in horses {
            let owner = match horse.owner_id {
                Some(owner_id) => match owners.get(&owner_id) {
                    Some(owner) => Some(owner.clone()),
                    None => {
                        return Err(Error::fatal(format!(
                            "Horse {} references owner {} which does not exist",
                            horse.id, owner_id
                        )))
                    }
                },
                None => None,
            };
            if search.matches(&horse, owner.as_ref()) {
                items.push(HorseListItem { horse, owner });
            }
        }

        if let Some(limit) = search.limit {
            items.truncate(limit);
        }
        tracing::debug!("list_horses matched {} horses", items.len());
        Ok(items)
    }

    async fn parent_candidates(
        &self,
        name: Option<&str>,
        sex: Sex,
        limit: usize,
    ) -> Result<Vec<HorseListItem>> {
        let mut search = HorseSearch::new().with_sex(sex).with_limit(limit);
        if let Some(name) = name {
            search = search.with_name(name);
        }
        self.list_horses(&search).await
    }

    async fn family_tree(&self, query: &AncestryQuery) -> Result<Vec<AncestorRecord>> {
        tracing::debug!("family_tree({:?})", query);
        Ok(self.storage.ancestors(query).await?)
    }

    async fn create_owner(&self, owner: NewOwner) -> Result<Owner> {
        tracing::debug!("create_owner({:?})", owner);

        let existing = self.storage.get_all_owners().await?;
        OwnerValidator::validate_for_create(&owner, &existing)?;

        let created = self.storage.create_owner(&owner).await?;
        tracing::info!("Created owner '{}' with id {}", created.full_name(), created.id);
        Ok(created)
    }

    async fn get_owner(&self, id: OwnerId) -> Result<Owner> {
        tracing::debug!("get_owner({})", id);
        self.require_owner(id).await
    }

    async fn get_owners(&self, ids: &[OwnerId]) -> Result<HashMap<OwnerId, Owner>> {
        tracing::debug!("get_owners({:?})", ids);

        let owners: HashMap<OwnerId, Owner> = self
            .storage
            .get_owners(ids)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        if let Some(missing) = ids.iter().find(|id| !owners.contains_key(id)) {
            return Err(Error::OwnerNotFound(*missing));
        }
        Ok(owners)
    }

    async fn search_owners(&self, search: &OwnerSearch) -> Result<Vec<Owner>> {
        tracing::debug!("search_owners({:?})", search);

        let owners = self.storage.get_all_owners().await?;
        let mut matched: Vec<Owner> = owners.into_iter().filter(|o| search.matches(o)).collect();
        if let Some(limit) = search.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}
