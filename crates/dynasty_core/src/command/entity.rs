//! Add / edit / delete of a single record, shared by every entity type.
//!
//! # Invariants
//! - An add applied again after undo reuses the identity from its first
//!   apply.
//! - Edit and delete capture the stored record on first apply only; every
//!   later apply and reverse works from that capture.
//! - Reverse writes the capture back as stored, even when an older file
//!   left it outside the current record rules.

use crate::model::event::Event;
use crate::model::family::Family;
use crate::model::major_event::MajorEvent;
use crate::model::marriage::Marriage;
use crate::model::person::Person;
use crate::model::portrait::Portrait;
use crate::model::EntityId;
use crate::repo::{PersistenceError, PersistenceResult, Record, Repository, SqliteRepository};
use crate::store::Store;

/// Human-facing name of a record for menu labels.
pub trait Describe {
    fn label(&self) -> Option<String>;
}

impl Describe for Person {
    fn label(&self) -> Option<String> {
        Some(self.full_name())
    }
}

impl Describe for Marriage {
    fn label(&self) -> Option<String> {
        None
    }
}

impl Describe for Event {
    fn label(&self) -> Option<String> {
        Some(self.event_title.clone())
    }
}

impl Describe for Portrait {
    fn label(&self) -> Option<String> {
        None
    }
}

impl Describe for Family {
    fn label(&self) -> Option<String> {
        Some(self.surname.clone())
    }
}

impl Describe for MajorEvent {
    fn label(&self) -> Option<String> {
        Some(self.event_name.clone())
    }
}

pub(crate) fn describe(verb: &str, entity: &str, label: Option<String>) -> String {
    match label {
        Some(label) => format!("{verb} {entity}: {label}"),
        None => format!("{verb} {entity}"),
    }
}

/// Inserts a new record.
#[derive(Debug, Clone)]
pub struct Add<R: Record> {
    record: R,
    assigned: Option<EntityId>,
}

impl<R: Record + Describe> Add<R> {
    /// `record` must not carry an identity yet.
    pub fn new(record: R) -> Self {
        Self {
            record,
            assigned: None,
        }
    }

    /// Identity given by the store on first apply.
    pub fn assigned_id(&self) -> Option<EntityId> {
        self.assigned
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let repo = SqliteRepository::<R>::new(store);
        match self.assigned {
            None => {
                self.assigned = Some(repo.insert(&self.record)?);
            }
            Some(id) => {
                let mut record = self.record.clone();
                record.set_id(Some(id));
                repo.insert_with_id(&record)?;
            }
        }
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let id = self
            .assigned
            .ok_or(PersistenceError::MissingIdentity { entity: R::ENTITY })?;
        SqliteRepository::<R>::new(store).delete(id)
    }

    pub(crate) fn description(&self) -> String {
        describe("Add", R::ENTITY, self.record.label())
    }
}

/// Replaces every field of an existing record.
#[derive(Debug, Clone)]
pub struct Edit<R: Record> {
    updated: R,
    previous: Option<R>,
}

impl<R: Record + Describe> Edit<R> {
    /// `updated` must carry the identity of the record it replaces.
    pub fn new(updated: R) -> Self {
        Self {
            updated,
            previous: None,
        }
    }

    pub fn previous(&self) -> Option<&R> {
        self.previous.as_ref()
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let repo = SqliteRepository::<R>::new(store);
        let previous = match &self.previous {
            Some(previous) => previous.clone(),
            None => {
                let id = self
                    .updated
                    .id()
                    .ok_or(PersistenceError::MissingIdentity { entity: R::ENTITY })?;
                repo.get_by_id(id)?.ok_or(PersistenceError::NotFound {
                    entity: R::ENTITY,
                    id,
                })?
            }
        };
        repo.update(&self.updated)?;
        self.previous = Some(previous);
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let previous = self
            .previous
            .as_ref()
            .ok_or(PersistenceError::MissingIdentity { entity: R::ENTITY })?;
        SqliteRepository::<R>::new(store).restore_fields(previous)
    }

    pub(crate) fn description(&self) -> String {
        describe("Edit", R::ENTITY, self.updated.label())
    }
}

/// Removes a record that nothing else depends on.
#[derive(Debug, Clone)]
pub struct Delete<R: Record> {
    id: EntityId,
    removed: Option<R>,
}

impl<R: Record + Describe> Delete<R> {
    pub fn new(id: EntityId) -> Self {
        Self { id, removed: None }
    }

    pub fn removed(&self) -> Option<&R> {
        self.removed.as_ref()
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        let repo = SqliteRepository::<R>::new(store);
        let removed = match &self.removed {
            Some(removed) => removed.clone(),
            None => repo.get_by_id(self.id)?.ok_or(PersistenceError::NotFound {
                entity: R::ENTITY,
                id: self.id,
            })?,
        };
        repo.delete(self.id)?;
        self.removed = Some(removed);
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        let removed = self
            .removed
            .as_ref()
            .ok_or(PersistenceError::NotFound {
                entity: R::ENTITY,
                id: self.id,
            })?;
        SqliteRepository::<R>::new(store).restore(removed)
    }

    pub(crate) fn description(&self) -> String {
        let label = self
            .removed
            .as_ref()
            .and_then(Describe::label)
            .or_else(|| Some(format!("#{}", self.id)));
        describe("Delete", R::ENTITY, label)
    }
}
