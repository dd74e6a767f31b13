//! Dynasty domain model.
//!
//! # Responsibility
//! - Define the records persisted by a dynasty document.
//! - Keep record-level invariants next to the data they constrain.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one; once assigned it never
//!   changes and is reused verbatim when a record is restored.
//! - Cross-references are plain optional identities; dangling references
//!   are rejected by the store's foreign keys, not by the model.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod date;
pub mod event;
pub mod family;
pub mod major_event;
pub mod marriage;
pub mod person;
pub mod portrait;
pub mod position;

/// Durable integer key assigned by the store on first insert.
pub type EntityId = i64;
pub type PersonId = EntityId;
pub type MarriageId = EntityId;
pub type EventId = EntityId;
pub type PortraitId = EntityId;
pub type FamilyId = EntityId;
pub type MajorEventId = EntityId;

/// Record-level invariant violations detected before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Required text field is blank after trim.
    BlankField {
        entity: &'static str,
        field: &'static str,
    },
    /// Person references itself as father or mother.
    SelfParent(PersonId),
    /// Father and mother point at the same person.
    SameParents(PersonId),
    /// Both spouse slots reference the same person.
    SameSpouse(PersonId),
    /// A closing date precedes its opening date.
    EndsBeforeStart {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => write!(f, "{entity}.{field} must not be blank"),
            Self::SelfParent(id) => write!(f, "person {id} cannot be their own parent"),
            Self::SameParents(id) => {
                write!(f, "person {id} cannot be both father and mother")
            }
            Self::SameSpouse(id) => write!(f, "person {id} cannot marry themselves"),
            Self::EndsBeforeStart { entity, field } => {
                write!(f, "{entity}.{field} precedes its start date")
            }
        }
    }
}

impl Error for RecordValidationError {}

pub(crate) fn require_text(
    value: &str,
    entity: &'static str,
    field: &'static str,
) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::BlankField { entity, field });
    }
    Ok(())
}

/// Rejects ranges whose end year is before the start year.
///
/// Comparison is year-granular: precision differs between the two ends too
/// often for finer checks to be meaningful.
pub(crate) fn require_ordered(
    start: Option<date::PartialDate>,
    end: Option<date::PartialDate>,
    entity: &'static str,
    field: &'static str,
) -> Result<(), RecordValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end.year() < start.year() {
            return Err(RecordValidationError::EndsBeforeStart { entity, field });
        }
    }
    Ok(())
}
