//! Document-scoped key/value settings.

use super::{PersistenceError, PersistenceResult};
use crate::store::Store;
use rusqlite::{params, OptionalExtension};

pub struct SettingsRepository<'s> {
    store: &'s Store,
}

impl<'s> SettingsRepository<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    pub fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        let value = self
            .store
            .conn()?
            .query_row("SELECT value FROM Settings WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        if key.trim().is_empty() {
            return Err(PersistenceError::InvalidData(
                "settings key must not be blank".to_string(),
            ));
        }
        self.store.conn()?.execute(
            "INSERT INTO Settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        self.store.mark_dirty();
        Ok(())
    }

    /// Returns whether the key existed.
    pub fn remove(&self, key: &str) -> PersistenceResult<bool> {
        let changed = self
            .store
            .conn()?
            .execute("DELETE FROM Settings WHERE key = ?1;", [key])?;
        if changed > 0 {
            self.store.mark_dirty();
        }
        Ok(changed > 0)
    }

    /// All settings ordered by key.
    pub fn list(&self) -> PersistenceResult<Vec<(String, String)>> {
        let conn = self.store.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM Settings ORDER BY key;")?;
        let settings = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(settings)
    }
}
