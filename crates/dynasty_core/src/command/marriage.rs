//! Ending a marriage.

use crate::model::date::PartialDate;
use crate::model::marriage::Marriage;
use crate::model::MarriageId;
use crate::repo::marriage_repo::MarriageRepository;
use crate::repo::{PersistenceError, PersistenceResult, Record, Repository};
use crate::store::Store;

/// Records the dissolution date and reason of a marriage.
#[derive(Debug, Clone)]
pub struct EndMarriage {
    marriage_id: MarriageId,
    dissolved: PartialDate,
    reason: Option<String>,
    previous: Option<Marriage>,
}

impl EndMarriage {
    pub fn new(marriage_id: MarriageId, dissolved: PartialDate, reason: Option<String>) -> Self {
        Self {
            marriage_id,
            dissolved,
            reason,
            previous: None,
        }
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let marriages = MarriageRepository::new(store);
        let previous = match &self.previous {
            Some(previous) => previous.clone(),
            None => marriages
                .get_by_id(self.marriage_id)?
                .ok_or(PersistenceError::NotFound {
                    entity: Marriage::ENTITY,
                    id: self.marriage_id,
                })?,
        };
        let mut ended = previous.clone();
        ended.dissolved = Some(self.dissolved);
        ended.dissolution_reason = self.reason.clone();
        marriages.update(&ended)?;
        self.previous = Some(previous);
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let previous = self.previous.as_ref().ok_or(PersistenceError::NotFound {
            entity: Marriage::ENTITY,
            id: self.marriage_id,
        })?;
        MarriageRepository::new(store).restore_fields(previous)
    }

    pub(crate) fn description(&self) -> String {
        "End Marriage".to_string()
    }
}
