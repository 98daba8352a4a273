//! Horse (pedigree node) types

use crate::owner::{Owner, OwnerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for a horse, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HorseId(pub i64);

impl std::fmt::Display for HorseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for HorseId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Sex of a horse, persisted as the literal `MALE` / `FEMALE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is neither `MALE` nor `FEMALE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSexError(pub String);

impl std::fmt::Display for ParseSexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown sex '{}', expected MALE or FEMALE", self.0)
    }
}

impl std::error::Error for ParseSexError {}

impl FromStr for Sex {
    type Err = ParseSexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Sex::Male),
            "FEMALE" => Ok(Sex::Female),
            _ => Err(ParseSexError(s.to_string())),
        }
    }
}

/// A persisted horse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<HorseId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<HorseId>,
}

impl Horse {
    pub fn new(id: impl Into<HorseId>, name: impl Into<String>, date_of_birth: NaiveDate, sex: Sex) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            date_of_birth,
            sex,
            owner_id: None,
            mother_id: None,
            father_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner_id = Some(owner);
        self
    }

    pub fn with_mother(mut self, mother: HorseId) -> Self {
        self.mother_id = Some(mother);
        self
    }

    pub fn with_father(mut self, father: HorseId) -> Self {
        self.father_id = Some(father);
        self
    }

    /// Parent ids in expansion order: mother first, then father
    pub fn parent_ids(&self) -> impl Iterator<Item = HorseId> {
        self.mother_id.into_iter().chain(self.father_id)
    }
}

/// A validated horse that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHorse {
    pub name: String,
    pub description: Option<String>,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub owner_id: Option<OwnerId>,
    pub mother_id: Option<HorseId>,
    pub father_id: Option<HorseId>,
}

impl NewHorse {
    /// Attach a store-assigned id
    pub fn into_horse(self, id: HorseId) -> Horse {
        Horse {
            id,
            name: self.name,
            description: self.description,
            date_of_birth: self.date_of_birth,
            sex: self.sex,
            owner_id: self.owner_id,
            mother_id: self.mother_id,
            father_id: self.father_id,
        }
    }
}

/// Raw create/update request as it arrives from the request layer.
///
/// Parents are referenced by id only; the registry resolves them into
/// snapshots before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HorseInput {
    #[serde(default)]
    pub id: Option<HorseId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
    #[serde(default)]
    pub mother_id: Option<HorseId>,
    #[serde(default)]
    pub father_id: Option<HorseId>,
}

impl HorseInput {
    /// Input that reproduces a stored horse, used as the base for edits
    pub fn from_horse(horse: &Horse) -> Self {
        Self {
            id: Some(horse.id),
            name: Some(horse.name.clone()),
            description: horse.description.clone(),
            date_of_birth: Some(horse.date_of_birth),
            sex: Some(horse.sex.to_string()),
            owner_id: horse.owner_id,
            mother_id: horse.mother_id,
            father_id: horse.father_id,
        }
    }
}

/// Candidate record checked by the lineage validator.
///
/// Mother and father are embedded snapshots that the caller resolved
/// beforehand; the validator never re-reads them from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HorseDraft {
    pub id: Option<HorseId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<String>,
    pub owner_id: Option<OwnerId>,
    pub mother: Option<Horse>,
    pub father: Option<Horse>,
}

impl HorseDraft {
    pub fn new(name: impl Into<String>, date_of_birth: NaiveDate, sex: Sex) -> Self {
        Self {
            name: Some(name.into()),
            date_of_birth: Some(date_of_birth),
            sex: Some(sex.to_string()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: HorseId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mother(mut self, mother: Horse) -> Self {
        self.mother = Some(mother);
        self
    }

    pub fn with_father(mut self, father: Horse) -> Self {
        self.father = Some(father);
        self
    }

    pub fn mother_id(&self) -> Option<HorseId> {
        self.mother.as_ref().map(|m| m.id)
    }

    pub fn father_id(&self) -> Option<HorseId> {
        self.father.as_ref().map(|f| f.id)
    }

    /// Parsed sex, `None` when missing or not a known value
    pub fn parsed_sex(&self) -> Option<Sex> {
        self.sex.as_deref().and_then(|s| s.parse().ok())
    }

    /// Convert into a store input. Only meaningful after validation passed.
    pub fn to_new_horse(&self) -> crate::Result<NewHorse> {
        let missing = |field: &str| crate::Error::InvalidInput(format!("draft is missing {}", field));
        Ok(NewHorse {
            name: self.name.clone().ok_or_else(|| missing("name"))?,
            description: self.description.clone(),
            date_of_birth: self.date_of_birth.ok_or_else(|| missing("date of birth"))?,
            sex: self.parsed_sex().ok_or_else(|| missing("sex"))?,
            owner_id: self.owner_id,
            mother_id: self.mother_id(),
            father_id: self.father_id(),
        })
    }
}

/// Fully resolved horse: owner plus one level of parent detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseDetail {
    #[serde(flatten)]
    pub horse: Horse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<Box<HorseDetail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<Box<HorseDetail>>,
}

impl HorseDetail {
    /// Detail without parents, as embedded one level below the requested horse
    pub fn leaf(horse: Horse, owner: Option<Owner>) -> Self {
        Self {
            horse,
            owner,
            mother: None,
            father: None,
        }
    }
}

/// Horse plus resolved owner, as shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseListItem {
    #[serde(flatten)]
    pub horse: Horse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sex_round_trips_literals() {
        assert_eq!("MALE".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("FEMALE".parse::<Sex>().unwrap(), Sex::Female);
        assert!("GELDING".parse::<Sex>().is_err());
        assert!("female".parse::<Sex>().is_err());
        assert!(" MALE ".parse::<Sex>().is_err());
        assert_eq!(serde_json::to_string(&Sex::Female).unwrap(), "\"FEMALE\"");
    }

    #[test]
    fn test_parent_ids_mother_first() {
        let horse = Horse::new(3, "Foal", date(2020, 1, 1), Sex::Male)
            .with_father(HorseId(2))
            .with_mother(HorseId(1));

        let parents: Vec<_> = horse.parent_ids().collect();
        assert_eq!(parents, vec![HorseId(1), HorseId(2)]);
    }

    #[test]
    fn test_draft_parent_ids_come_from_snapshots() {
        let mother = Horse::new(-1, "Wendy", date(2010, 5, 5), Sex::Female);
        let draft = HorseDraft::new("Foal", date(2020, 1, 1), Sex::Male).with_mother(mother);

        assert_eq!(draft.mother_id(), Some(HorseId(-1)));
        assert_eq!(draft.father_id(), None);

        let new_horse = draft.to_new_horse().unwrap();
        assert_eq!(new_horse.mother_id, Some(HorseId(-1)));
        assert_eq!(new_horse.into_horse(HorseId(9)).id, HorseId(9));
    }

    #[test]
    fn test_detail_serializes_flat() {
        let horse = Horse::new(1, "Wendy", date(2010, 5, 5), Sex::Female);
        let json = serde_json::to_value(HorseDetail::leaf(horse, None)).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["sex"], "FEMALE");
        assert!(json.get("mother").is_none());
    }
}
