//! Reversible document mutations.
//!
//! # Responsibility
//! - Wrap every user-intended change in a value that can be applied,
//!   reversed and applied again.
//! - Remember just enough state (assigned identities, captured records)
//!   for reversal to restore the exact prior rows.
//!
//! # Invariants
//! - `apply` and `reverse` strictly alternate per command, starting with
//!   `apply`; the history manager enforces this, which is why both are
//!   crate-private.
//! - A failed `apply`/`reverse` leaves the command's captured state as it
//!   was before the call.

use crate::model::date::PartialDate;
use crate::model::event::Event;
use crate::model::family::Family;
use crate::model::major_event::MajorEvent;
use crate::model::marriage::Marriage;
use crate::model::person::{ParentRole, Person};
use crate::model::portrait::Portrait;
use crate::model::position::PersonPosition;
use crate::model::{EntityId, FamilyId, MarriageId, PersonId};
use crate::repo::PersistenceResult;
use crate::store::Store;

mod batch;
mod entity;
mod family;
mod marriage;
mod person;
mod position;

pub use batch::Batch;
pub use entity::{Add, Delete, Describe, Edit};
pub use family::DeleteFamily;
pub use marriage::EndMarriage;
pub use person::{AssignParent, CreateChild, DeletePerson};
pub use position::MovePerson;

/// Every mutation the history manager can sequence.
#[derive(Debug)]
pub enum Command {
    AddPerson(Add<Person>),
    EditPerson(Edit<Person>),
    DeletePerson(DeletePerson),
    AddMarriage(Add<Marriage>),
    EditMarriage(Edit<Marriage>),
    DeleteMarriage(Delete<Marriage>),
    AddEvent(Add<Event>),
    EditEvent(Edit<Event>),
    DeleteEvent(Delete<Event>),
    AddPortrait(Add<Portrait>),
    EditPortrait(Edit<Portrait>),
    DeletePortrait(Delete<Portrait>),
    AddFamily(Add<Family>),
    EditFamily(Edit<Family>),
    DeleteFamily(DeleteFamily),
    AddMajorEvent(Add<MajorEvent>),
    EditMajorEvent(Edit<MajorEvent>),
    DeleteMajorEvent(Delete<MajorEvent>),
    AssignParent(AssignParent),
    CreateChild(CreateChild),
    EndMarriage(EndMarriage),
    MovePerson(MovePerson),
    Batch(Batch),
}

macro_rules! dispatch {
    ($command:expr, $inner:ident => $call:expr) => {
        match $command {
            Command::AddPerson($inner) => $call,
            Command::EditPerson($inner) => $call,
            Command::DeletePerson($inner) => $call,
            Command::AddMarriage($inner) => $call,
            Command::EditMarriage($inner) => $call,
            Command::DeleteMarriage($inner) => $call,
            Command::AddEvent($inner) => $call,
            Command::EditEvent($inner) => $call,
            Command::DeleteEvent($inner) => $call,
            Command::AddPortrait($inner) => $call,
            Command::EditPortrait($inner) => $call,
            Command::DeletePortrait($inner) => $call,
            Command::AddFamily($inner) => $call,
            Command::EditFamily($inner) => $call,
            Command::DeleteFamily($inner) => $call,
            Command::AddMajorEvent($inner) => $call,
            Command::EditMajorEvent($inner) => $call,
            Command::DeleteMajorEvent($inner) => $call,
            Command::AssignParent($inner) => $call,
            Command::CreateChild($inner) => $call,
            Command::EndMarriage($inner) => $call,
            Command::MovePerson($inner) => $call,
            Command::Batch($inner) => $call,
        }
    };
}

impl Command {
    pub fn add_person(person: Person) -> Self {
        Self::AddPerson(Add::new(person))
    }

    pub fn edit_person(person: Person) -> Self {
        Self::EditPerson(Edit::new(person))
    }

    /// Deletes the person along with owned events, portraits and position.
    pub fn delete_person(person_id: PersonId) -> Self {
        Self::DeletePerson(DeletePerson::new(person_id))
    }

    pub fn add_marriage(marriage: Marriage) -> Self {
        Self::AddMarriage(Add::new(marriage))
    }

    pub fn edit_marriage(marriage: Marriage) -> Self {
        Self::EditMarriage(Edit::new(marriage))
    }

    pub fn delete_marriage(marriage_id: MarriageId) -> Self {
        Self::DeleteMarriage(Delete::new(marriage_id))
    }

    pub fn add_event(event: Event) -> Self {
        Self::AddEvent(Add::new(event))
    }

    pub fn edit_event(event: Event) -> Self {
        Self::EditEvent(Edit::new(event))
    }

    pub fn delete_event(event_id: EntityId) -> Self {
        Self::DeleteEvent(Delete::new(event_id))
    }

    pub fn add_portrait(portrait: Portrait) -> Self {
        Self::AddPortrait(Add::new(portrait))
    }

    pub fn edit_portrait(portrait: Portrait) -> Self {
        Self::EditPortrait(Edit::new(portrait))
    }

    pub fn delete_portrait(portrait_id: EntityId) -> Self {
        Self::DeletePortrait(Delete::new(portrait_id))
    }

    pub fn add_family(family: Family) -> Self {
        Self::AddFamily(Add::new(family))
    }

    pub fn edit_family(family: Family) -> Self {
        Self::EditFamily(Edit::new(family))
    }

    pub fn delete_family(family_id: FamilyId) -> Self {
        Self::DeleteFamily(DeleteFamily::new(family_id))
    }

    pub fn add_major_event(event: MajorEvent) -> Self {
        Self::AddMajorEvent(Add::new(event))
    }

    pub fn edit_major_event(event: MajorEvent) -> Self {
        Self::EditMajorEvent(Edit::new(event))
    }

    pub fn delete_major_event(event_id: EntityId) -> Self {
        Self::DeleteMajorEvent(Delete::new(event_id))
    }

    pub fn assign_parent(child_id: PersonId, role: ParentRole, parent_id: PersonId) -> Self {
        Self::AssignParent(AssignParent::new(child_id, role, Some(parent_id)))
    }

    pub fn unassign_parent(child_id: PersonId, role: ParentRole) -> Self {
        Self::AssignParent(AssignParent::new(child_id, role, None))
    }

    pub fn create_child(child: Person, father: Option<PersonId>, mother: Option<PersonId>) -> Self {
        Self::CreateChild(CreateChild::new(child, father, mother))
    }

    pub fn end_marriage(
        marriage_id: MarriageId,
        dissolved: PartialDate,
        reason: Option<String>,
    ) -> Self {
        Self::EndMarriage(EndMarriage::new(marriage_id, dissolved, reason))
    }

    pub fn move_person(position: PersonPosition) -> Self {
        Self::MovePerson(MovePerson::new(position))
    }

    pub fn batch(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Self::Batch(Batch::new(label, commands))
    }

    /// Menu label, e.g. `Add Person: Anna Smith`.
    pub fn description(&self) -> String {
        dispatch!(self, command => command.description())
    }

    /// Stable, content-free name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddPerson(_) => "add_person",
            Self::EditPerson(_) => "edit_person",
            Self::DeletePerson(_) => "delete_person",
            Self::AddMarriage(_) => "add_marriage",
            Self::EditMarriage(_) => "edit_marriage",
            Self::DeleteMarriage(_) => "delete_marriage",
            Self::AddEvent(_) => "add_event",
            Self::EditEvent(_) => "edit_event",
            Self::DeleteEvent(_) => "delete_event",
            Self::AddPortrait(_) => "add_portrait",
            Self::EditPortrait(_) => "edit_portrait",
            Self::DeletePortrait(_) => "delete_portrait",
            Self::AddFamily(_) => "add_family",
            Self::EditFamily(_) => "edit_family",
            Self::DeleteFamily(_) => "delete_family",
            Self::AddMajorEvent(_) => "add_major_event",
            Self::EditMajorEvent(_) => "edit_major_event",
            Self::DeleteMajorEvent(_) => "delete_major_event",
            Self::AssignParent(_) => "assign_parent",
            Self::CreateChild(_) => "create_child",
            Self::EndMarriage(_) => "end_marriage",
            Self::MovePerson(_) => "move_person",
            Self::Batch(_) => "batch",
        }
    }

    /// Identity the store assigned on first apply, for commands that insert.
    pub fn assigned_id(&self) -> Option<EntityId> {
        match self {
            Self::AddPerson(command) => command.assigned_id(),
            Self::AddMarriage(command) => command.assigned_id(),
            Self::AddEvent(command) => command.assigned_id(),
            Self::AddPortrait(command) => command.assigned_id(),
            Self::AddFamily(command) => command.assigned_id(),
            Self::AddMajorEvent(command) => command.assigned_id(),
            Self::CreateChild(command) => command.assigned_id(),
            _ => None,
        }
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        dispatch!(self, command => command.apply(store))
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        dispatch!(self, command => command.reverse(store))
    }
}
