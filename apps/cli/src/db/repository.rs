//! Repository pattern for database access.

use crate::db::error::DbError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use wordmatch_core::{AudioSettings, KeyValueStore, StorageError};

type Result<T> = std::result::Result<T, DbError>;

/// Repository for audio settings.
pub trait SettingsRepository {
    fn get_audio_settings(&self) -> Result<AudioSettings>;
    fn save_audio_settings(&self, settings: &AudioSettings) -> Result<()>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing, or when the data directory is unusable).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_AUDIO_SETTINGS)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Read a raw entry.
    fn get_entry(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    /// Insert or overwrite a raw entry.
    fn put_entry(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn delete_entry(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

}

impl KeyValueStore for SqliteRepository {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        self.get_entry(key).map_err(Into::into)
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        self.put_entry(key, value).map_err(Into::into)
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
        self.delete_entry(key).map_err(Into::into)
    }
}

impl SettingsRepository for SqliteRepository {
    fn get_audio_settings(&self) -> Result<AudioSettings> {
        let settings = self.conn.query_row(
            "SELECT muted, volume FROM audio_settings WHERE id = 1",
            [],
            |row| {
                Ok(AudioSettings {
                    muted: row.get::<_, i64>(0)? != 0,
                    volume: row.get::<_, f64>(1)? as f32,
                })
            },
        )?;
        if !settings.volume.is_finite() {
            return Err(DbError::InvalidData(format!(
                "audio volume {} is not a number",
                settings.volume
            )));
        }
        Ok(settings.clamped())
    }

    fn save_audio_settings(&self, settings: &AudioSettings) -> Result<()> {
        let settings = settings.clamped();
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE audio_settings SET muted = ?1, volume = ?2, updated_at = ?3 WHERE id = 1",
            params![settings.muted, f64::from(settings.volume), now],
        )?;
        Ok(())
    }
}
