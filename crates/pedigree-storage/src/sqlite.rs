//! SQLite storage backend

use crate::error::{StorageError, StorageResult};
use crate::migration::Migratable;
use crate::traits::StorageBackend;
use async_trait::async_trait;
use chrono::NaiveDate;
use pedigree_core::{Horse, HorseId, NewHorse, NewOwner, Owner, OwnerId, Sex};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const HORSE_COLUMNS: &str =
    "id, name, description, date_of_birth, sex, owner_id, mother_id, father_id";

const OWNER_COLUMNS: &str = "id, first_name, last_name, email";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

/// A horse row before the sex column has been checked
struct HorseRow {
    id: i64,
    name: String,
    description: Option<String>,
    date_of_birth: NaiveDate,
    sex: String,
    owner_id: Option<i64>,
    mother_id: Option<i64>,
    father_id: Option<i64>,
}

impl HorseRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            date_of_birth: row.get(3)?,
            sex: row.get(4)?,
            owner_id: row.get(5)?,
            mother_id: row.get(6)?,
            father_id: row.get(7)?,
        })
    }

    fn into_horse(self) -> StorageResult<Horse> {
        let sex: Sex = self.sex.parse().map_err(|e| {
            StorageError::Corrupt(format!("horse {} has invalid sex: {}", self.id, e))
        })?;
        Ok(Horse {
            id: HorseId(self.id),
            name: self.name,
            description: self.description,
            date_of_birth: self.date_of_birth,
            sex,
            owner_id: self.owner_id.map(OwnerId),
            mother_id: self.mother_id.map(HorseId),
            father_id: self.father_id.map(HorseId),
        })
    }
}

fn owner_from_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: OwnerId(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
    })
}

impl SqliteStorage {
    /// Open or create a SQLite database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path).map_err(|e| StorageError::Database(e.to_string()))?;

        let storage = Self { conn: Mutex::new(conn) };
        storage.init_tables()?;

        Ok(storage)
    }

    /// Create an in-memory SQLite database (for testing)
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::Database(e.to_string()))?;

        let storage = Self { conn: Mutex::new(conn) };
        storage.init_tables()?;

        Ok(storage)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }

    fn init_tables(&self) -> StorageResult<()> {
        {
            let conn = self.lock()?;
            conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS schema_version (
                    version INTEGER NOT NULL
                );
                "#,
            )
            .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        self.migrate_to_latest()
    }

    fn insert_horse_row(conn: &Connection, id: Option<HorseId>, horse: &NewHorse) -> StorageResult<i64> {
        conn.execute(
            "INSERT OR REPLACE INTO horse (id, name, description, date_of_birth, sex, owner_id, mother_id, father_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.map(|id| id.0),
                horse.name,
                horse.description,
                horse.date_of_birth,
                horse.sex.as_str(),
                horse.owner_id.map(|id| id.0),
                horse.mother_id.map(|id| id.0),
                horse.father_id.map(|id| id.0),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_owner_row(conn: &Connection, id: Option<OwnerId>, owner: &NewOwner) -> StorageResult<i64> {
        conn.execute(
            "INSERT OR REPLACE INTO owner (id, first_name, last_name, email) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.map(|id| id.0),
                owner.first_name.as_deref().unwrap_or_default(),
                owner.last_name.as_deref().unwrap_or_default(),
                owner.email,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

impl Migratable for SqliteStorage {
    fn get_schema_version(&self) -> StorageResult<u32> {
        let conn = self.lock()?;
        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        Ok(version.unwrap_or(0))
    }

    fn set_schema_version(&self, version: u32) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", params![version])
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        Ok(())
    }

    fn run_migration(&self, version: u32) -> StorageResult<()> {
        let sql = match version {
            1 => {
                r#"
                CREATE TABLE IF NOT EXISTS owner (
                    id INTEGER PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT
                );

                CREATE TABLE IF NOT EXISTS horse (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT,
                    date_of_birth TEXT NOT NULL,
                    sex TEXT NOT NULL,
                    owner_id INTEGER,
                    mother_id INTEGER,
                    father_id INTEGER
                );
                "#
            }
            2 => {
                r#"
                CREATE INDEX IF NOT EXISTS idx_horse_mother ON horse(mother_id);
                CREATE INDEX IF NOT EXISTS idx_horse_father ON horse(father_id);
                CREATE INDEX IF NOT EXISTS idx_horse_owner ON horse(owner_id);
                "#
            }
            other => {
                return Err(StorageError::Migration(format!("Unknown schema version {}", other)));
            }
        };

        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(true)
    }

    async fn get_all_horses(&self) -> StorageResult<Vec<Horse>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM horse ORDER BY id", HORSE_COLUMNS))?;
        let rows = stmt.query_map([], HorseRow::from_row)?;

        let mut horses = Vec::new();
        for row in rows {
            horses.push(row?.into_horse()?);
        }

        Ok(horses)
    }

    async fn get_horse(&self, id: HorseId) -> StorageResult<Horse> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM horse WHERE id = ?1", HORSE_COLUMNS))?;
        let rows = stmt
            .query_map(params![id.0], HorseRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut rows = rows.into_iter();
        match (rows.next(), rows.next()) {
            (None, _) => Err(StorageError::HorseNotFound(id)),
            (Some(row), None) => row.into_horse(),
            (Some(_), Some(_)) => Err(StorageError::DuplicateHorse(id)),
        }
    }

    async fn create_horse(&self, horse: &NewHorse) -> StorageResult<Horse> {
        let conn = self.lock()?;
        let id = Self::insert_horse_row(&conn, None, horse)?;
        tracing::debug!(id, name = %horse.name, "Inserted horse");
        Ok(horse.clone().into_horse(HorseId(id)))
    }

    async fn update_horse(&self, horse: &Horse) -> StorageResult<Horse> {
        let conn = self.lock()?;

        let changed = conn.execute(
            "UPDATE horse SET name = ?2, description = ?3, date_of_birth = ?4, sex = ?5,
                 owner_id = ?6, mother_id = ?7, father_id = ?8
             WHERE id = ?1",
            params![
                horse.id.0,
                horse.name,
                horse.description,
                horse.date_of_birth,
                horse.sex.as_str(),
                horse.owner_id.map(|id| id.0),
                horse.mother_id.map(|id| id.0),
                horse.father_id.map(|id| id.0),
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::HorseNotFound(horse.id));
        }
        Ok(horse.clone())
    }

    async fn delete_horse(&self, id: HorseId) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM horse WHERE id = ?1", params![id.0])?;
        Ok(())
    }

    async fn insert_horse(&self, horse: &Horse) -> StorageResult<()> {
        let conn = self.lock()?;
        let new_horse = NewHorse {
            name: horse.name.clone(),
            description: horse.description.clone(),
            date_of_birth: horse.date_of_birth,
            sex: horse.sex,
            owner_id: horse.owner_id,
            mother_id: horse.mother_id,
            father_id: horse.father_id,
        };
        Self::insert_horse_row(&conn, Some(horse.id), &new_horse)?;
        Ok(())
    }

    async fn create_owner(&self, owner: &NewOwner) -> StorageResult<Owner> {
        let conn = self.lock()?;
        let id = Self::insert_owner_row(&conn, None, owner)?;
        Ok(owner.clone().into_owner(OwnerId(id)))
    }

    async fn insert_owner(&self, owner: &Owner) -> StorageResult<()> {
        let conn = self.lock()?;
        let new_owner = NewOwner {
            first_name: Some(owner.first_name.clone()),
            last_name: Some(owner.last_name.clone()),
            email: owner.email.clone(),
        };
        Self::insert_owner_row(&conn, Some(owner.id), &new_owner)?;
        Ok(())
    }

    async fn get_owner(&self, id: OwnerId) -> StorageResult<Owner> {
        let conn = self.lock()?;

        conn.query_row(
            &format!("SELECT {} FROM owner WHERE id = ?1", OWNER_COLUMNS),
            params![id.0],
            owner_from_row,
        )
        .optional()?
        .ok_or(StorageError::OwnerNotFound(id))
    }

    async fn get_owners(&self, ids: &[OwnerId]) -> StorageResult<Vec<Owner>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM owner WHERE id = ?1", OWNER_COLUMNS))?;
        let mut owners = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(owner) = stmt.query_row(params![id.0], owner_from_row).optional()? {
                owners.push(owner);
            }
        }

        Ok(owners)
    }

    async fn get_all_owners(&self) -> StorageResult<Vec<Owner>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM owner ORDER BY id", OWNER_COLUMNS))?;
        let owners = stmt
            .query_map([], owner_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(owners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::CURRENT_VERSION;
    use pedigree_core::AncestryQuery;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_horse(name: &str, sex: Sex) -> NewHorse {
        NewHorse {
            name: name.to_string(),
            description: Some("bay".to_string()),
            date_of_birth: date(2015, 4, 1),
            sex,
            owner_id: None,
            mother_id: None,
            father_id: None,
        }
    }

    #[tokio::test]
    async fn test_sqlite_storage() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert!(storage.health_check().await.unwrap());

        let created = storage.create_horse(&new_horse("Wendy", Sex::Female)).await.unwrap();
        let retrieved = storage.get_horse(created.id).await.unwrap();
        assert_eq!(retrieved, created);
        assert_eq!(retrieved.date_of_birth, date(2015, 4, 1));

        storage.delete_horse(created.id).await.unwrap();
        assert!(matches!(
            storage.get_horse(created.id).await,
            Err(StorageError::HorseNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sqlite_update() {
        let storage = SqliteStorage::in_memory().unwrap();
        let mut horse = storage.create_horse(&new_horse("Wendy", Sex::Female)).await.unwrap();

        horse.name = "Wendy II".to_string();
        horse.description = None;
        storage.update_horse(&horse).await.unwrap();

        let retrieved = storage.get_horse(horse.id).await.unwrap();
        assert_eq!(retrieved.name, "Wendy II");
        assert_eq!(retrieved.description, None);

        let ghost = Horse::new(999, "Ghost", date(2010, 1, 1), Sex::Male);
        assert!(matches!(
            storage.update_horse(&ghost).await,
            Err(StorageError::HorseNotFound(HorseId(999)))
        ));
    }

    #[tokio::test]
    async fn test_sqlite_explicit_ids_and_ancestors() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage
            .insert_horse(&Horse::new(-1, "Wendy", date(2010, 1, 1), Sex::Female))
            .await
            .unwrap();
        storage
            .insert_horse(&Horse::new(-2, "Candy", date(2009, 1, 1), Sex::Male))
            .await
            .unwrap();

        let mut foal = new_horse("Foal", Sex::Male);
        foal.mother_id = Some(HorseId(-1));
        foal.father_id = Some(HorseId(-2));
        let foal = storage.create_horse(&foal).await.unwrap();
        assert!(foal.id.0 >= 0);

        let query = AncestryQuery::new(foal.id, 1).unwrap();
        let records = storage.ancestors(&query).await.unwrap();
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_sqlite_owners() {
        let storage = SqliteStorage::in_memory().unwrap();
        let ada = storage
            .create_owner(&NewOwner::new("Ada", "Byron").with_email("ada@example.com"))
            .await
            .unwrap();

        assert_eq!(storage.get_owner(ada.id).await.unwrap(), ada);
        assert!(matches!(
            storage.get_owner(OwnerId(42)).await,
            Err(StorageError::OwnerNotFound(OwnerId(42)))
        ));

        let found = storage.get_owners(&[OwnerId(42), ada.id]).await.unwrap();
        assert_eq!(found, vec![ada]);
    }

    #[tokio::test]
    async fn test_sqlite_rejects_corrupt_sex() {
        let storage = SqliteStorage::in_memory().unwrap();
        {
            let conn = storage.lock().unwrap();
            conn.execute(
                "INSERT INTO horse (id, name, date_of_birth, sex) VALUES (5, 'Odd', '2010-01-01', 'GELDING')",
                [],
            )
            .unwrap();
        }

        assert!(matches!(
            storage.get_horse(HorseId(5)).await,
            Err(StorageError::Corrupt(_))
        ));
        assert!(storage.get_all_horses().await.is_err());
    }

    #[tokio::test]
    async fn test_sqlite_rejects_lowercase_sex() {
        let storage = SqliteStorage::in_memory().unwrap();
        {
            let conn = storage.lock().unwrap();
            conn.execute(
                "INSERT INTO horse (id, name, date_of_birth, sex) VALUES (6, 'Mare', '2010-01-01', 'female')",
                [],
            )
            .unwrap();
        }

        assert!(matches!(
            storage.get_horse(HorseId(6)).await,
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_sqlite_schema_version() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), CURRENT_VERSION);
    }

    #[tokio::test]
    async fn test_sqlite_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pedigree.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.create_horse(&new_horse("Wendy", Sex::Female)).await.unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        let horses = storage.get_all_horses().await.unwrap();
        assert_eq!(horses.len(), 1);
        assert_eq!(storage.get_schema_version().unwrap(), CURRENT_VERSION);
    }
}
