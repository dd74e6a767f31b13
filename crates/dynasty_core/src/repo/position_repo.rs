//! Canvas positions keyed by person.

use super::{PersistenceError, PersistenceResult};
use crate::model::position::PersonPosition;
use crate::model::PersonId;
use crate::store::Store;
use rusqlite::{params, OptionalExtension};

pub struct PositionRepository<'s> {
    store: &'s Store,
}

impl<'s> PositionRepository<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    pub fn get(&self, person_id: PersonId) -> PersistenceResult<Option<PersonPosition>> {
        let position = self
            .store
            .conn()?
            .query_row(
                "SELECT person_id, view_type, x_position, y_position
                 FROM PersonPosition WHERE person_id = ?1;",
                [person_id],
                |row| {
                    Ok(PersonPosition {
                        person_id: row.get(0)?,
                        view_type: row.get(1)?,
                        x: row.get(2)?,
                        y: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(position)
    }

    /// Inserts or replaces the position of `position.person_id`.
    pub fn upsert(&self, position: &PersonPosition) -> PersistenceResult<()> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(PersistenceError::InvalidData(format!(
                "non-finite position for person {}",
                position.person_id
            )));
        }
        self.store.conn()?.execute(
            "INSERT INTO PersonPosition (person_id, view_type, x_position, y_position)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(person_id) DO UPDATE SET
                view_type = excluded.view_type,
                x_position = excluded.x_position,
                y_position = excluded.y_position;",
            params![position.person_id, position.view_type, position.x, position.y],
        )?;
        self.store.mark_dirty();
        Ok(())
    }

    /// Removes a stored position. Returns whether one existed.
    pub fn remove(&self, person_id: PersonId) -> PersistenceResult<bool> {
        let changed = self
            .store
            .conn()?
            .execute("DELETE FROM PersonPosition WHERE person_id = ?1;", [person_id])?;
        if changed > 0 {
            self.store.mark_dirty();
        }
        Ok(changed > 0)
    }
}
