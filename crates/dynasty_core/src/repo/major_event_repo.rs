//! MajorEvent table mapping.

use super::{
    optional_text, push_date, read_date, text, PersistenceError, PersistenceResult, Record,
    SqliteRepository,
};
use crate::model::major_event::MajorEvent;
use crate::model::{EntityId, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::Row;

pub type MajorEventRepository<'s> = SqliteRepository<'s, MajorEvent>;

impl Record for MajorEvent {
    const ENTITY: &'static str = "MajorEvent";
    const TABLE: &'static str = "MajorEvent";
    const COLUMNS: &'static [&'static str] = &[
        "event_name",
        "event_type",
        "start_year",
        "start_month",
        "start_day",
        "end_year",
        "end_month",
        "end_day",
        "description",
        "color",
    ];
    const ORDER_BY: &'static str = "start_year, start_month, start_day, id";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        MajorEvent::validate(self)
    }

    fn bind_values(&self) -> Vec<Value> {
        let mut values = vec![text(&self.event_name), text(&self.event_type)];
        push_date(&mut values, Some(self.start));
        push_date(&mut values, self.end);
        values.extend([
            optional_text(self.description.as_deref()),
            optional_text(self.color.as_deref()),
        ]);
        values
    }

    fn from_row(row: &Row<'_>) -> PersistenceResult<Self> {
        let start = read_date(row, Self::TABLE, "start")?.ok_or_else(|| {
            PersistenceError::InvalidData("MajorEvent.start_year is missing".to_string())
        })?;
        Ok(Self {
            id: Some(row.get("id")?),
            event_name: row.get("event_name")?,
            event_type: row.get("event_type")?,
            start,
            end: read_date(row, Self::TABLE, "end")?,
            description: row.get("description")?,
            color: row.get("color")?,
        })
    }
}
