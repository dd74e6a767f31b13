//! Life event owned by one person.
//!
//! # Invariants
//! - `person_id` always names the owning person; deleting that person
//!   deletes the event.
//! - `event_title` is non-blank.

use super::date::PartialDate;
use super::{require_ordered, require_text, EventId, PersonId, RecordValidationError};
use serde::{Deserialize, Serialize};

/// Well-known event types. Free text is allowed as well.
pub const EVENT_TYPES: &[&str] = &[
    "Birth",
    "Marriage",
    "Death",
    "Job",
    "Move",
    "Education",
    "Other",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<EventId>,
    pub person_id: PersonId,
    pub event_type: String,
    pub event_title: String,
    pub start: Option<PartialDate>,
    pub end: Option<PartialDate>,
    pub notes: String,
}

impl Event {
    pub fn new(
        person_id: PersonId,
        event_type: impl Into<String>,
        event_title: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            person_id,
            event_type: event_type.into(),
            event_title: event_title.into(),
            start: None,
            end: None,
            notes: String::new(),
        }
    }

    /// Started and not yet ended.
    pub fn is_ongoing(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    /// Whole years between start and end, when both are known.
    pub fn duration_years(&self) -> Option<i32> {
        Some(self.end?.year() - self.start?.year())
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text(&self.event_type, "Event", "event_type")?;
        require_text(&self.event_title, "Event", "event_title")?;
        require_ordered(self.start, self.end, "Event", "end")
    }
}
