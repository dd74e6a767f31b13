//! World events shown on the shared timeline (wars, plagues, festivals).

use super::date::PartialDate;
use super::{require_ordered, require_text, MajorEventId, RecordValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorEvent {
    pub id: Option<MajorEventId>,
    pub event_name: String,
    pub event_type: String,
    /// Major events always have at least a start year.
    pub start: PartialDate,
    pub end: Option<PartialDate>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl MajorEvent {
    pub fn new(
        event_name: impl Into<String>,
        event_type: impl Into<String>,
        start: PartialDate,
    ) -> Self {
        Self {
            id: None,
            event_name: event_name.into(),
            event_type: event_type.into(),
            start,
            end: None,
            description: None,
            color: None,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text(&self.event_name, "MajorEvent", "event_name")?;
        require_text(&self.event_type, "MajorEvent", "event_type")?;
        require_ordered(Some(self.start), self.end, "MajorEvent", "end")
    }
}
