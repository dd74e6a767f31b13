//! Portrait table mapping.

use super::{
    bool_value, push_date, read_bool, read_date, text, PersistenceResult, Record,
    SqliteRepository,
};
use crate::model::portrait::Portrait;
use crate::model::{EntityId, PersonId, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::Row;

pub type PortraitRepository<'s> = SqliteRepository<'s, Portrait>;

impl Record for Portrait {
    const ENTITY: &'static str = "Portrait";
    const TABLE: &'static str = "Portrait";
    const COLUMNS: &'static [&'static str] = &[
        "person_id",
        "image_path",
        "valid_from_year",
        "valid_from_month",
        "valid_from_day",
        "valid_to_year",
        "valid_to_month",
        "valid_to_day",
        "is_primary",
        "display_order",
    ];
    const ORDER_BY: &'static str = "person_id, display_order, id";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        Portrait::validate(self)
    }

    fn bind_values(&self) -> Vec<Value> {
        let mut values = vec![Value::Integer(self.person_id), text(&self.image_path)];
        push_date(&mut values, self.valid_from);
        push_date(&mut values, self.valid_to);
        values.extend([bool_value(self.is_primary), Value::Integer(self.display_order)]);
        values
    }

    fn from_row(row: &Row<'_>) -> PersistenceResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            person_id: row.get("person_id")?,
            image_path: row.get("image_path")?,
            valid_from: read_date(row, Self::TABLE, "valid_from")?,
            valid_to: read_date(row, Self::TABLE, "valid_to")?,
            is_primary: read_bool(row, Self::TABLE, "is_primary")?,
            display_order: row.get("display_order")?,
        })
    }
}

impl SqliteRepository<'_, Portrait> {
    /// Portraits of `person_id` in display order.
    pub fn get_by_person(&self, person_id: PersonId) -> PersistenceResult<Vec<Portrait>> {
        self.query_where(
            &format!("WHERE person_id = ?1 ORDER BY {};", Portrait::ORDER_BY),
            [Value::Integer(person_id)],
        )
    }
}
