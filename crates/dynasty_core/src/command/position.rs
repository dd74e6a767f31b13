//! Moving a person box on the canvas.

use crate::model::position::PersonPosition;
use crate::repo::position_repo::PositionRepository;
use crate::repo::{PersistenceError, PersistenceResult};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct MovePerson {
    position: PersonPosition,
    /// `Some(None)` once applied onto a person without a stored position.
    previous: Option<Option<PersonPosition>>,
}

impl MovePerson {
    pub fn new(position: PersonPosition) -> Self {
        Self {
            position,
            previous: None,
        }
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let positions = PositionRepository::new(store);
        let previous = match &self.previous {
            Some(previous) => previous.clone(),
            None => positions.get(self.position.person_id)?,
        };
        positions.upsert(&self.position)?;
        self.previous = Some(previous);
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let positions = PositionRepository::new(store);
        match &self.previous {
            Some(Some(previous)) => positions.upsert(previous),
            Some(None) => positions.remove(self.position.person_id).map(|_| ()),
            None => Err(PersistenceError::NotFound {
                entity: "PersonPosition",
                id: self.position.person_id,
            }),
        }
    }

    pub(crate) fn description(&self) -> String {
        "Move Person".to_string()
    }
}
