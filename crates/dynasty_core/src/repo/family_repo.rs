//! Family table mapping.

use super::{
    bool_value, optional_text, push_date, read_bool, read_date, text, PersistenceResult, Record,
    SqliteRepository,
};
use crate::model::family::Family;
use crate::model::{EntityId, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::Row;

pub type FamilyRepository<'s> = SqliteRepository<'s, Family>;

impl Record for Family {
    const ENTITY: &'static str = "Family";
    const TABLE: &'static str = "Family";
    const COLUMNS: &'static [&'static str] = &[
        "surname",
        "move_in_year",
        "move_in_month",
        "move_in_day",
        "coat_of_arms_path",
        "family_color",
        "is_extinct",
        "notes",
    ];
    const ORDER_BY: &'static str = "surname, id";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        Family::validate(self)
    }

    fn bind_values(&self) -> Vec<Value> {
        let mut values = vec![text(&self.surname)];
        push_date(&mut values, self.moved_in);
        values.extend([
            optional_text(self.coat_of_arms_path.as_deref()),
            optional_text(self.family_color.as_deref()),
            bool_value(self.is_extinct),
            text(&self.notes),
        ]);
        values
    }

    fn from_row(row: &Row<'_>) -> PersistenceResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            surname: row.get("surname")?,
            moved_in: read_date(row, Self::TABLE, "move_in")?,
            coat_of_arms_path: row.get("coat_of_arms_path")?,
            family_color: row.get("family_color")?,
            is_extinct: read_bool(row, Self::TABLE, "is_extinct")?,
            notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
        })
    }
}
