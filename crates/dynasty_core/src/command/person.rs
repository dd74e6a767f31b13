//! Person commands that touch more than one row.
//!
//! # Invariants
//! - Deleting a person and undoing it restores the person, everything the
//!   store cascaded away with them and every reference it nulled.
//! - Parent assignment restores the exact prior slot value, including
//!   "no parent".

use super::entity::describe;
use crate::model::event::Event;
use crate::model::marriage::Marriage;
use crate::model::person::{ParentRole, Person};
use crate::model::portrait::Portrait;
use crate::model::position::PersonPosition;
use crate::model::PersonId;
use crate::repo::event_repo::EventRepository;
use crate::repo::marriage_repo::MarriageRepository;
use crate::repo::person_repo::PersonRepository;
use crate::repo::portrait_repo::PortraitRepository;
use crate::repo::position_repo::PositionRepository;
use crate::repo::{PersistenceError, PersistenceResult, Record, Repository};
use crate::store::Store;

/// Everything removed or rewritten when a person row is deleted.
#[derive(Debug, Clone)]
struct RemovedPerson {
    person: Person,
    events: Vec<Event>,
    portraits: Vec<Portrait>,
    position: Option<PersonPosition>,
    /// Children whose parent slot pointed at the person.
    children: Vec<(PersonId, ParentRole)>,
    /// Marriages as they were before the spouse slot was nulled.
    marriages: Vec<Marriage>,
}

/// Deletes a person with owned events, portraits and position.
#[derive(Debug, Clone)]
pub struct DeletePerson {
    person_id: PersonId,
    removed: Option<RemovedPerson>,
}

impl DeletePerson {
    pub fn new(person_id: PersonId) -> Self {
        Self {
            person_id,
            removed: None,
        }
    }

    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    fn capture(&self, store: &Store) -> PersistenceResult<RemovedPerson> {
        let people = PersonRepository::new(store);
        let person = people
            .get_by_id(self.person_id)?
            .ok_or(PersistenceError::NotFound {
                entity: Person::ENTITY,
                id: self.person_id,
            })?;

        let mut children = Vec::new();
        for child in people.get_children(self.person_id)? {
            let Some(child_id) = child.id else { continue };
            for role in [ParentRole::Father, ParentRole::Mother] {
                if child.parent(role) == Some(self.person_id) {
                    children.push((child_id, role));
                }
            }
        }

        Ok(RemovedPerson {
            person,
            events: EventRepository::new(store).get_by_person(self.person_id)?,
            portraits: PortraitRepository::new(store).get_by_person(self.person_id)?,
            position: PositionRepository::new(store).get(self.person_id)?,
            children,
            marriages: MarriageRepository::new(store).get_by_person(self.person_id)?,
        })
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let removed = match &self.removed {
            Some(removed) => removed.clone(),
            None => self.capture(store)?,
        };
        PersonRepository::new(store).delete(self.person_id)?;
        self.removed = Some(removed);
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let removed = self.removed.as_ref().ok_or(PersistenceError::NotFound {
            entity: Person::ENTITY,
            id: self.person_id,
        })?;

        let people = PersonRepository::new(store);
        people.restore(&removed.person)?;

        let events = EventRepository::new(store);
        for event in &removed.events {
            events.restore(event)?;
        }
        let portraits = PortraitRepository::new(store);
        for portrait in &removed.portraits {
            portraits.restore(portrait)?;
        }
        if let Some(position) = &removed.position {
            PositionRepository::new(store).upsert(position)?;
        }
        for (child_id, role) in &removed.children {
            people.restore_parent(*child_id, *role, Some(self.person_id))?;
        }
        let marriages = MarriageRepository::new(store);
        for marriage in &removed.marriages {
            marriages.restore_fields(marriage)?;
        }
        Ok(())
    }

    pub(crate) fn description(&self) -> String {
        let label = match &self.removed {
            Some(removed) => removed.person.full_name(),
            None => format!("#{}", self.person_id),
        };
        describe("Delete", Person::ENTITY, Some(label))
    }
}

/// Sets or clears one parent slot of a person.
#[derive(Debug, Clone)]
pub struct AssignParent {
    child_id: PersonId,
    role: ParentRole,
    parent: Option<PersonId>,
    previous: Option<Option<PersonId>>,
}

impl AssignParent {
    /// `parent = None` removes the link.
    pub fn new(child_id: PersonId, role: ParentRole, parent: Option<PersonId>) -> Self {
        Self {
            child_id,
            role,
            parent,
            previous: None,
        }
    }

    /// Slot value before the first apply.
    pub fn previous(&self) -> Option<Option<PersonId>> {
        self.previous
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let people = PersonRepository::new(store);
        let previous = match self.previous {
            Some(previous) => previous,
            None => people
                .get_by_id(self.child_id)?
                .ok_or(PersistenceError::NotFound {
                    entity: Person::ENTITY,
                    id: self.child_id,
                })?
                .parent(self.role),
        };
        people.set_parent(self.child_id, self.role, self.parent)?;
        self.previous = Some(previous);
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let previous = self.previous.ok_or(PersistenceError::NotFound {
            entity: Person::ENTITY,
            id: self.child_id,
        })?;
        PersonRepository::new(store).restore_parent(self.child_id, self.role, previous)
    }

    pub(crate) fn description(&self) -> String {
        match self.parent {
            Some(_) => format!("Assign {}", self.role.label()),
            None => format!("Unassign {}", self.role.label()),
        }
    }
}

/// Adds a person and links both parents in one step.
#[derive(Debug, Clone)]
pub struct CreateChild {
    child: Person,
    father: Option<PersonId>,
    mother: Option<PersonId>,
    assigned: Option<PersonId>,
}

impl CreateChild {
    /// Parent slots already set on `child` are overridden by `father`/`mother`.
    pub fn new(child: Person, father: Option<PersonId>, mother: Option<PersonId>) -> Self {
        Self {
            child,
            father,
            mother,
            assigned: None,
        }
    }

    pub fn assigned_id(&self) -> Option<PersonId> {
        self.assigned
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let people = PersonRepository::new(store);
        let mut child = self.child.clone();
        child.father_id = None;
        child.mother_id = None;

        let id = match self.assigned {
            None => people.insert(&child)?,
            Some(id) => {
                child.id = Some(id);
                people.insert_with_id(&child)?;
                id
            }
        };
        people.set_parent(id, ParentRole::Father, self.father)?;
        people.set_parent(id, ParentRole::Mother, self.mother)?;
        self.assigned = Some(id);
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let id = self.assigned.ok_or(PersistenceError::MissingIdentity {
            entity: Person::ENTITY,
        })?;
        PersonRepository::new(store).delete(id)
    }

    pub(crate) fn description(&self) -> String {
        format!("Create Child: {}", self.child.full_name())
    }
}
