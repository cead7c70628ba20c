use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{Connection, params};

/// Storage key holding the whole recipe collection as one JSON array.
pub const RECIPES_KEY: &str = "coffee-recipes";
pub const SOUND_ENABLED_KEY: &str = "isSoundEnabled";
pub const VIBRATION_ENABLED_KEY: &str = "isVibrationEnabled";
pub const LOCALE_KEY: &str = "locale";

/// Local key-value storage backed by a single `SQLite` table.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv_store (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let now = Local::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .with_context(|| format!("Failed to write '{key}'"))?;
        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_store WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn delete_value(&self, key: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }

    /// Read a JSON boolean flag; anything unparsable counts as unset.
    pub fn get_flag(&self, key: &str) -> Result<Option<bool>> {
        Ok(self
            .get_value(key)?
            .and_then(|v| serde_json::from_str::<bool>(&v).ok()))
    }

    pub fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        self.set_value(key, &serde_json::to_string(&value)?)
    }

    /// Refuse every later write on this connection.
    #[cfg(test)]
    pub(crate) fn set_read_only(&self) -> Result<()> {
        self.conn.pragma_update(None, "query_only", true)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_value() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_value("nope").unwrap(), None);
    }

    #[test]
    fn test_set_and_get_value() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(LOCALE_KEY, "ko").unwrap();
        assert_eq!(db.get_value(LOCALE_KEY).unwrap().as_deref(), Some("ko"));
    }

    #[test]
    fn test_set_value_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(RECIPES_KEY, "[]").unwrap();
        db.set_value(RECIPES_KEY, "[{\"id\":\"a\"}]").unwrap();
        assert_eq!(
            db.get_value(RECIPES_KEY).unwrap().as_deref(),
            Some("[{\"id\":\"a\"}]")
        );
    }

    #[test]
    fn test_delete_value() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(LOCALE_KEY, "en").unwrap();
        assert!(db.delete_value(LOCALE_KEY).unwrap());
        assert!(!db.delete_value(LOCALE_KEY).unwrap());
        assert_eq!(db.get_value(LOCALE_KEY).unwrap(), None);
    }

    #[test]
    fn test_flags() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_flag(SOUND_ENABLED_KEY).unwrap(), None);
        db.set_flag(SOUND_ENABLED_KEY, false).unwrap();
        assert_eq!(db.get_value(SOUND_ENABLED_KEY).unwrap().as_deref(), Some("false"));
        assert_eq!(db.get_flag(SOUND_ENABLED_KEY).unwrap(), Some(false));
    }

    #[test]
    fn test_garbage_flag_is_unset() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(VIBRATION_ENABLED_KEY, "maybe").unwrap();
        assert_eq!(db.get_flag(VIBRATION_ENABLED_KEY).unwrap(), None);
    }

    #[test]
    fn test_reopen_file_keeps_values() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("pour.db");
        {
            let db = Database::open(&path).unwrap();
            db.set_value(LOCALE_KEY, "ko").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_value(LOCALE_KEY).unwrap().as_deref(), Some("ko"));
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let db = Database::open_in_memory().unwrap();
        db.set_value(LOCALE_KEY, "en").unwrap();
        db.set_read_only().unwrap();
        assert!(db.set_value(LOCALE_KEY, "ko").is_err());
        assert_eq!(db.get_value(LOCALE_KEY).unwrap().as_deref(), Some("en"));
    }
}
