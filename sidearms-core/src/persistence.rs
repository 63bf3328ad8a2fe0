//! SQLite save store for weapon memories.
//!
//! Each character's [`WeaponMemory`] is serialised to JSON in its save
//! layout and stored in a per-campaign SQLite database:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS weapon_memories (
//!     character_id INTEGER PRIMARY KEY,
//!     data         BLOB NOT NULL,
//!     updated_at   TEXT NOT NULL,
//!     checksum     TEXT
//! );
//! ```
//!
//! - JSON inside a BLOB column keeps old saves readable when fields are
//!   added; unknown weapon references are dealt with by the repair pass.
//! - Optional CRC-32 checksum detects save corruption.
//! - A row that no longer decodes is skipped when loading a whole campaign,
//!   so one bad record never costs the rest.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info, warn};

use crate::config::PersistenceConfig;
use crate::error::{Result, SidearmsError};
use crate::memory::WeaponMemory;
use crate::registry::SaveData;
use crate::types::CharacterId;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS weapon_memories (
    character_id INTEGER PRIMARY KEY,
    data         BLOB NOT NULL,
    updated_at   TEXT NOT NULL,
    checksum     TEXT
);";

// ---------------------------------------------------------------------------
// CRC-32 checksum helper
// ---------------------------------------------------------------------------

/// CRC-32 of `data` as a lowercase hex string.
fn crc32_hex(data: &[u8]) -> String {
    format!("{:08x}", crc32_compute(data))
}

/// Basic CRC-32 (ISO 3309 / ITU-T V.42) computation.
fn crc32_compute(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            if crc & 1 == 1 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }
    !crc
}

// ---------------------------------------------------------------------------
// SaveStore
// ---------------------------------------------------------------------------

/// Handle to an open SQLite database holding one campaign's weapon memories.
///
/// # Usage
///
/// ```no_run
/// # use sidearms_core::persistence::SaveStore;
/// # use sidearms_core::config::PersistenceConfig;
/// # use sidearms_core::registry::SaveData;
/// let store = SaveStore::open("colony_sidearms.db", &PersistenceConfig::default())?;
/// store.save_all(&SaveData::new())?;
/// let save = store.load_all()?;
/// # Ok::<(), sidearms_core::error::SidearmsError>(())
/// ```
pub struct SaveStore {
    conn: Connection,
    config: PersistenceConfig,
    db_path: PathBuf,
}

impl std::fmt::Debug for SaveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveStore")
            .field("db_path", &self.db_path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SaveStore {
    /// Open (or create) an SQLite database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            "Sidearms save store opened"
        );

        Ok(Self {
            conn,
            config: config.clone(),
            db_path,
        })
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Database`] on SQLite failures.
    pub fn open_in_memory(config: &PersistenceConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn,
            config: config.clone(),
            db_path: PathBuf::from(":memory:"),
        })
    }

    // ------------------------------------------------------------------
    // Single records
    // ------------------------------------------------------------------

    /// Save (upsert) the memory of `character`.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Serialization`] if JSON encoding fails, or
    /// [`SidearmsError::Database`] on SQLite failures.
    pub fn save_memory(&self, character: CharacterId, memory: &WeaponMemory) -> Result<()> {
        let json = serde_json::to_vec(memory).map_err(|e| SidearmsError::Serialization(e.to_string()))?;
        let checksum = self.config.checksum_enabled.then(|| crc32_hex(&json));
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO weapon_memories (character_id, data, updated_at, checksum)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(character_id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at,
                checksum = excluded.checksum",
            params![character.0, json, now, checksum],
        )?;

        debug!(
            character = %character,
            remembered = memory.remembered_weapons().len(),
            bytes = json.len(),
            "Saved weapon memory"
        );
        Ok(())
    }

    /// Load the memory of `character`.
    ///
    /// Returns `None` if no row exists. A checksum mismatch is logged but
    /// the data is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Serialization`] if JSON decoding fails, or
    /// [`SidearmsError::Database`] on SQLite failures.
    pub fn load_memory(&self, character: CharacterId) -> Result<Option<WeaponMemory>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT data, checksum FROM weapon_memories WHERE character_id = ?1")?;

        let result: Option<(Vec<u8>, Option<String>)> = stmt
            .query_row(params![character.0], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let Some((data, stored_checksum)) = result else {
            return Ok(None);
        };
        self.decode(character, &data, stored_checksum.as_deref()).map(Some)
    }

    /// Delete the memory of `character`. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Database`] on SQLite failures.
    pub fn delete_memory(&self, character: CharacterId) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM weapon_memories WHERE character_id = ?1",
            params![character.0],
        )?;
        Ok(deleted > 0)
    }

    // ------------------------------------------------------------------
    // Whole campaign
    // ------------------------------------------------------------------

    /// Replace the stored campaign with `save`, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Serialization`] or [`SidearmsError::Database`].
    pub fn save_all(&self, save: &SaveData) -> Result<()> {
        let start = Instant::now();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM weapon_memories", [])?;
        for (character, memory) in &save.memories {
            self.save_memory(*character, memory)?;
        }
        tx.commit()?;

        info!(
            memories = save.memories.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Saved sidearms campaign"
        );
        Ok(())
    }

    /// Load every stored memory.
    ///
    /// Rows that fail to decode are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Database`] on SQLite failures.
    pub fn load_all(&self) -> Result<SaveData> {
        let start = Instant::now();
        let mut stmt = self
            .conn
            .prepare_cached("SELECT character_id, data, checksum FROM weapon_memories")?;
        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let data: Vec<u8> = row.get(1)?;
            let checksum: Option<String> = row.get(2)?;
            Ok((CharacterId(id), data, checksum))
        })?;

        let mut save = SaveData::new();
        for row in rows {
            let (character, data, checksum) = row?;
            match self.decode(character, &data, checksum.as_deref()) {
                Ok(memory) => {
                    save.memories.insert(character, memory);
                }
                Err(e) => warn!(
                    character = %character,
                    error = %e,
                    "Skipping weapon memory that could not be decoded"
                ),
            }
        }

        info!(
            memories = save.memories.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Loaded sidearms campaign"
        );
        Ok(save)
    }

    /// IDs of every character with a stored memory.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Database`] on SQLite failures.
    pub fn list_characters(&self) -> Result<Vec<CharacterId>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT character_id FROM weapon_memories ORDER BY character_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

        let mut characters = Vec::new();
        for row in rows {
            characters.push(CharacterId(row?));
        }
        Ok(characters)
    }

    /// Number of stored memories.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Database`] on SQLite failures.
    pub fn character_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weapon_memories", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Copy the database to `dest_path` using SQLite's online-backup API.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Database`] on SQLite failures.
    pub fn backup<P: AsRef<Path>>(&self, dest_path: P) -> Result<()> {
        let start = Instant::now();
        let mut dest = Connection::open(dest_path.as_ref())?;
        let backup = rusqlite::backup::Backup::new(&self.conn, &mut dest)?;
        backup.run_to_completion(256, std::time::Duration::from_millis(50), None)?;

        info!(
            dest = %dest_path.as_ref().display(),
            elapsed_ms = start.elapsed().as_millis(),
            "Save store backup completed"
        );
        Ok(())
    }

    /// Path to the database file (or `:memory:` for in-memory DBs).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run an integrity check on the database.
    ///
    /// # Errors
    ///
    /// Returns [`SidearmsError::Database`] if the check query itself fails.
    pub fn integrity_check(&self) -> Result<bool> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        Ok(result == "ok")
    }

    fn decode(&self, character: CharacterId, data: &[u8], stored_checksum: Option<&str>) -> Result<WeaponMemory> {
        if self.config.checksum_enabled {
            if let Some(expected) = stored_checksum {
                let actual = crc32_hex(data);
                if expected != actual {
                    warn!(
                        character = %character,
                        expected = %expected,
                        actual = %actual,
                        "Checksum mismatch — possible save corruption"
                    );
                }
            }
        }
        serde_json::from_slice(data).map_err(|e| SidearmsError::Serialization(e.to_string()))
    }
}

/// Adds an `.optional()` combinator to `rusqlite::Result`.
trait OptionalExt<T> {
    /// Convert `QueryReturnedNoRows` into `Ok(None)`.
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
