//! Marriage table mapping and spouse lookups.

use super::{
    optional_id, optional_text, push_date, read_date, text, PersistenceResult, Record,
    SqliteRepository,
};
use crate::model::marriage::{Marriage, DEFAULT_MARRIAGE_TYPE};
use crate::model::{EntityId, PersonId, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::Row;

pub type MarriageRepository<'s> = SqliteRepository<'s, Marriage>;

impl Record for Marriage {
    const ENTITY: &'static str = "Marriage";
    const TABLE: &'static str = "Marriage";
    const COLUMNS: &'static [&'static str] = &[
        "spouse1_id",
        "spouse2_id",
        "marriage_year",
        "marriage_month",
        "marriage_day",
        "dissolution_year",
        "dissolution_month",
        "dissolution_day",
        "dissolution_reason",
        "marriage_type",
        "notes",
    ];
    const ORDER_BY: &'static str = "marriage_year, marriage_month, id";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        Marriage::validate(self)
    }

    fn bind_values(&self) -> Vec<Value> {
        let mut values = vec![optional_id(self.spouse1_id), optional_id(self.spouse2_id)];
        push_date(&mut values, self.married);
        push_date(&mut values, self.dissolved);
        values.extend([
            optional_text(self.dissolution_reason.as_deref()),
            text(&self.marriage_type),
            text(&self.notes),
        ]);
        values
    }

    fn from_row(row: &Row<'_>) -> PersistenceResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            spouse1_id: row.get("spouse1_id")?,
            spouse2_id: row.get("spouse2_id")?,
            married: read_date(row, Self::TABLE, "marriage")?,
            dissolved: read_date(row, Self::TABLE, "dissolution")?,
            dissolution_reason: row.get("dissolution_reason")?,
            marriage_type: row
                .get::<_, Option<String>>("marriage_type")?
                .unwrap_or_else(|| DEFAULT_MARRIAGE_TYPE.to_string()),
            notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
        })
    }
}

impl SqliteRepository<'_, Marriage> {
    /// Every marriage `person_id` takes part in, active or not.
    pub fn get_by_person(&self, person_id: PersonId) -> PersistenceResult<Vec<Marriage>> {
        self.query_where(
            &format!(
                "WHERE spouse1_id = ?1 OR spouse2_id = ?1 ORDER BY {};",
                Marriage::ORDER_BY
            ),
            [Value::Integer(person_id)],
        )
    }

    /// Marriages of `person_id` without a dissolution date.
    pub fn get_active_for_person(&self, person_id: PersonId) -> PersistenceResult<Vec<Marriage>> {
        self.query_where(
            &format!(
                "WHERE (spouse1_id = ?1 OR spouse2_id = ?1) AND dissolution_year IS NULL
                 ORDER BY {};",
                Marriage::ORDER_BY
            ),
            [Value::Integer(person_id)],
        )
    }

    /// Spouses across all marriages of `person_id`, in marriage order.
    pub fn spouse_of(&self, person_id: PersonId) -> PersistenceResult<Vec<PersonId>> {
        let mut spouses = Vec::new();
        for marriage in self.get_by_person(person_id)? {
            if let Some(spouse) = marriage.spouse_of(person_id) {
                if !spouses.contains(&spouse) {
                    spouses.push(spouse);
                }
            }
        }
        Ok(spouses)
    }
}
