//! Person table mapping and lineage queries.
//!
//! # Invariants
//! - `set_parent` goes through the full record validation, so a person can
//!   never become their own parent through this path either.

use super::{
    bool_value, optional_id, optional_text, push_date, read_bool, read_date, text,
    PersistenceError, PersistenceResult, Record, Repository, SqliteRepository,
};
use crate::model::person::{Gender, ParentRole, Person};
use crate::model::{EntityId, FamilyId, PersonId, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::Row;

pub type PersonRepository<'s> = SqliteRepository<'s, Person>;

impl Record for Person {
    const ENTITY: &'static str = "Person";
    const TABLE: &'static str = "Person";
    const COLUMNS: &'static [&'static str] = &[
        "first_name",
        "middle_name",
        "last_name",
        "maiden_name",
        "nickname",
        "gender",
        "birth_year",
        "birth_month",
        "birth_day",
        "death_year",
        "death_month",
        "death_day",
        "arrival_year",
        "arrival_month",
        "arrival_day",
        "moved_out_year",
        "moved_out_month",
        "moved_out_day",
        "father_id",
        "mother_id",
        "family_id",
        "dynasty_id",
        "is_founder",
        "education",
        "is_favorite",
        "notes",
    ];
    const ORDER_BY: &'static str = "last_name, first_name, id";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: Option<EntityId>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        Person::validate(self)
    }

    fn bind_values(&self) -> Vec<Value> {
        let mut values = vec![
            text(&self.first_name),
            text(&self.middle_name),
            text(&self.last_name),
            optional_text(self.maiden_name.as_deref()),
            text(&self.nickname),
            optional_text(self.gender.map(Gender::as_db)),
        ];
        push_date(&mut values, self.birth);
        push_date(&mut values, self.death);
        push_date(&mut values, self.arrival);
        push_date(&mut values, self.moved_out);
        values.extend([
            optional_id(self.father_id),
            optional_id(self.mother_id),
            optional_id(self.family_id),
            Value::Integer(self.dynasty_id),
            bool_value(self.is_founder),
            Value::Integer(self.education),
            bool_value(self.is_favorite),
            text(&self.notes),
        ]);
        values
    }

    fn from_row(row: &Row<'_>) -> PersistenceResult<Self> {
        let gender = match row.get::<_, Option<String>>("gender")? {
            None => None,
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(Gender::parse_db(&value).ok_or_else(|| {
                PersistenceError::InvalidData(format!("invalid gender `{value}` in Person.gender"))
            })?),
        };

        Ok(Self {
            id: Some(row.get("id")?),
            first_name: row.get("first_name")?,
            middle_name: row.get::<_, Option<String>>("middle_name")?.unwrap_or_default(),
            last_name: row.get("last_name")?,
            maiden_name: row.get("maiden_name")?,
            nickname: row.get::<_, Option<String>>("nickname")?.unwrap_or_default(),
            gender,
            birth: read_date(row, Self::TABLE, "birth")?,
            death: read_date(row, Self::TABLE, "death")?,
            arrival: read_date(row, Self::TABLE, "arrival")?,
            moved_out: read_date(row, Self::TABLE, "moved_out")?,
            father_id: row.get("father_id")?,
            mother_id: row.get("mother_id")?,
            family_id: row.get("family_id")?,
            dynasty_id: row.get("dynasty_id")?,
            is_founder: read_bool(row, Self::TABLE, "is_founder")?,
            education: row.get("education")?,
            is_favorite: read_bool(row, Self::TABLE, "is_favorite")?,
            notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
        })
    }
}

impl SqliteRepository<'_, Person> {
    /// Exact first/last name match.
    pub fn get_by_name(&self, first_name: &str, last_name: &str) -> PersistenceResult<Vec<Person>> {
        self.query_where(
            &format!(
                "WHERE first_name = ?1 AND last_name = ?2 ORDER BY {};",
                Person::ORDER_BY
            ),
            [text(first_name), text(last_name)],
        )
    }

    /// People whose father or mother is `parent_id`.
    pub fn get_children(&self, parent_id: PersonId) -> PersistenceResult<Vec<Person>> {
        self.query_where(
            &format!(
                "WHERE father_id = ?1 OR mother_id = ?1 ORDER BY {};",
                Person::ORDER_BY
            ),
            [Value::Integer(parent_id)],
        )
    }

    /// People born in or before `year` and not dead before it.
    ///
    /// People without a birth date are never included.
    pub fn get_alive_in_year(&self, year: i32) -> PersistenceResult<Vec<Person>> {
        self.query_where(
            &format!(
                "WHERE birth_year IS NOT NULL AND birth_year <= ?1
                   AND (death_year IS NULL OR death_year >= ?1)
                 ORDER BY {};",
                Person::ORDER_BY
            ),
            [Value::Integer(i64::from(year))],
        )
    }

    pub fn members_of_family(&self, family_id: FamilyId) -> PersistenceResult<Vec<Person>> {
        self.query_where(
            &format!("WHERE family_id = ?1 ORDER BY {};", Person::ORDER_BY),
            [Value::Integer(family_id)],
        )
    }

    /// Points the `role` parent slot of `child_id` at `parent`, or clears it.
    pub fn set_parent(
        &self,
        child_id: PersonId,
        role: ParentRole,
        parent: Option<PersonId>,
    ) -> PersistenceResult<()> {
        let mut child = self.get_by_id(child_id)?.ok_or(PersistenceError::NotFound {
            entity: Person::ENTITY,
            id: child_id,
        })?;
        child.set_parent(role, parent);
        self.update(&child)
    }

    /// Points every listed person's family slot at `family_id`.
    ///
    /// All or nothing: an unknown id rolls back the rows already changed.
    pub fn set_family(
        &self,
        person_ids: &[PersonId],
        family_id: Option<FamilyId>,
    ) -> PersistenceResult<()> {
        self.store().transaction(|store| {
            let conn = store.conn()?;
            for person_id in person_ids {
                let changed = conn.execute(
                    "UPDATE Person SET family_id = ?1 WHERE id = ?2;",
                    rusqlite::params![family_id, person_id],
                )?;
                if changed == 0 {
                    return Err(PersistenceError::NotFound {
                        entity: Person::ENTITY,
                        id: *person_id,
                    });
                }
                store.mark_dirty();
            }
            Ok(())
        })
    }

    /// Puts a captured parent slot value back without re-validating the row.
    pub(crate) fn restore_parent(
        &self,
        child_id: PersonId,
        role: ParentRole,
        parent: Option<PersonId>,
    ) -> PersistenceResult<()> {
        let mut child = self.get_by_id(child_id)?.ok_or(PersistenceError::NotFound {
            entity: Person::ENTITY,
            id: child_id,
        })?;
        child.set_parent(role, parent);
        self.restore_fields(&child)
    }
}
