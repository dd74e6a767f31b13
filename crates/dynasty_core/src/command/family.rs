//! Family deletion that remembers its members.

use super::entity::describe;
use crate::model::family::Family;
use crate::model::{FamilyId, PersonId};
use crate::repo::family_repo::FamilyRepository;
use crate::repo::person_repo::PersonRepository;
use crate::repo::{PersistenceError, PersistenceResult, Record, Repository};
use crate::store::Store;

/// Deletes a family; members stay but lose their family link until undo.
#[derive(Debug, Clone)]
pub struct DeleteFamily {
    family_id: FamilyId,
    removed: Option<(Family, Vec<PersonId>)>,
}

impl DeleteFamily {
    pub fn new(family_id: FamilyId) -> Self {
        Self {
            family_id,
            removed: None,
        }
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let families = FamilyRepository::new(store);
        let removed = match &self.removed {
            Some(removed) => removed.clone(),
            None => {
                let family = families
                    .get_by_id(self.family_id)?
                    .ok_or(PersistenceError::NotFound {
                        entity: Family::ENTITY,
                        id: self.family_id,
                    })?;
                let members = PersonRepository::new(store)
                    .members_of_family(self.family_id)?
                    .into_iter()
                    .filter_map(|person| person.id)
                    .collect();
                (family, members)
            }
        };
        families.delete(self.family_id)?;
        self.removed = Some(removed);
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let (family, members) = self.removed.as_ref().ok_or(PersistenceError::NotFound {
            entity: Family::ENTITY,
            id: self.family_id,
        })?;
        FamilyRepository::new(store).restore(family)?;
        PersonRepository::new(store).set_family(members, Some(self.family_id))
    }

    pub(crate) fn description(&self) -> String {
        let label = match &self.removed {
            Some((family, _)) => family.surname.clone(),
            None => format!("#{}", self.family_id),
        };
        describe("Delete", Family::ENTITY, Some(label))
    }
}
