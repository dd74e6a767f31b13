//! Event table mapping.

use super::{push_date, read_date, text, PersistenceResult, Record, SqliteRepository};
use crate::model::event::Event;
use crate::model::{EntityId, PersonId, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::Row;

pub type EventRepository<'s> = SqliteRepository<'s, Event>;

impl Record for Event {
    const ENTITY: &'static str = "Event";
    const TABLE: &'static str = "Event";
    const COLUMNS: &'static [&'static str] = &[
        "person_id",
        "event_type",
        "event_title",
        "start_year",
        "start_month",
        "start_day",
        "end_year",
        "end_month",
        "end_day",
        "notes",
    ];
    const ORDER_BY: &'static str = "person_id, start_year, start_month, start_day, id";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        Event::validate(self)
    }

    fn bind_values(&self) -> Vec<Value> {
        let mut values = vec![
            Value::Integer(self.person_id),
            text(&self.event_type),
            text(&self.event_title),
        ];
        push_date(&mut values, self.start);
        push_date(&mut values, self.end);
        values.push(text(&self.notes));
        values
    }

    fn from_row(row: &Row<'_>) -> PersistenceResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            person_id: row.get("person_id")?,
            event_type: row.get("event_type")?,
            event_title: row.get("event_title")?,
            start: read_date(row, Self::TABLE, "start")?,
            end: read_date(row, Self::TABLE, "end")?,
            notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
        })
    }
}

impl SqliteRepository<'_, Event> {
    /// Events owned by `person_id`, oldest first.
    pub fn get_by_person(&self, person_id: PersonId) -> PersistenceResult<Vec<Event>> {
        self.query_where(
            &format!("WHERE person_id = ?1 ORDER BY {};", Event::ORDER_BY),
            [Value::Integer(person_id)],
        )
    }
}
