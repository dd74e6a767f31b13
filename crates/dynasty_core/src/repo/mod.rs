//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the CRUD contract every entity table shares.
//! - Isolate SQLite query details from commands and sessions.
//! - Report store failures as one `PersistenceError` taxonomy.
//!
//! # Invariants
//! - Public write paths call the record's `validate()` before SQL mutations;
//!   only crate-internal restores of captured rows skip it.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every successful mutation marks the owning store dirty; failed
//!   mutations leave the flag untouched.

use crate::db::DbError;
use crate::model::date::{month_from_text, DateValidationError, PartialDate};
use crate::model::{EntityId, RecordValidationError};
use crate::store::Store;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub mod event_repo;
pub mod family_repo;
pub mod major_event_repo;
pub mod marriage_repo;
pub mod person_repo;
pub mod portrait_repo;
pub mod position_repo;
pub mod settings_repo;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure of a store or repository call.
#[derive(Debug)]
pub enum PersistenceError {
    /// The document has been closed; no connection is attached.
    StoreClosed,
    /// Record failed its own invariants before reaching SQL.
    Validation(RecordValidationError),
    /// Target identity does not exist.
    NotFound { entity: &'static str, id: EntityId },
    /// `insert_with_id` onto an identity that is already taken.
    IdentityOccupied { entity: &'static str, id: EntityId },
    /// Operation needs a record that already carries an identity.
    MissingIdentity { entity: &'static str },
    /// Plain insert received a record that already carries an identity.
    UnexpectedIdentity { entity: &'static str, id: EntityId },
    /// SQLite rejected the write (foreign key, NOT NULL, uniqueness).
    ConstraintViolation(String),
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
    /// Save requested for a document that has never been given a path.
    NoDocumentPath,
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreClosed => write!(f, "document store is not open"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::IdentityOccupied { entity, id } => {
                write!(f, "{entity} identity {id} is already in use")
            }
            Self::MissingIdentity { entity } => write!(f, "{entity} record has no identity"),
            Self::UnexpectedIdentity { entity, id } => {
                write!(f, "{entity} record already has identity {id}")
            }
            Self::ConstraintViolation(message) => write!(f, "constraint violated: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::NoDocumentPath => write!(f, "document has no file path"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for PersistenceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        match &value {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::ConstraintViolation(value.to_string())
            }
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Table mapping for one entity type.
///
/// `bind_values` must yield one value per entry of `COLUMNS`, in order.
pub trait Record: Clone {
    /// Entity name used in errors and logs.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Persisted columns, excluding `id`.
    const COLUMNS: &'static [&'static str];
    /// Natural order used by `get_all`; must end in a unique key.
    const ORDER_BY: &'static str;

    fn id(&self) -> Option<EntityId>;
    fn set_id(&mut self, id: Option<EntityId>);
    fn validate(&self) -> Result<(), RecordValidationError>;
    fn bind_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> PersistenceResult<Self>;
}

/// CRUD contract shared by every entity repository.
pub trait Repository<R: Record> {
    /// Persists a record without identity and returns the assigned one.
    fn insert(&self, record: &R) -> PersistenceResult<EntityId>;
    /// Persists a record reusing the identity it already carries.
    fn insert_with_id(&self, record: &R) -> PersistenceResult<()>;
    fn get_by_id(&self, id: EntityId) -> PersistenceResult<Option<R>>;
    /// All records in the entity's natural order.
    fn get_all(&self) -> PersistenceResult<Vec<R>>;
    /// Replaces every field of an existing record.
    fn update(&self, record: &R) -> PersistenceResult<()>;
    fn delete(&self, id: EntityId) -> PersistenceResult<()>;
    fn exists(&self, id: EntityId) -> PersistenceResult<bool>;
}

/// SQLite-backed repository for any [`Record`].
pub struct SqliteRepository<'s, R: Record> {
    store: &'s Store,
    _record: PhantomData<R>,
}

impl<'s, R: Record> SqliteRepository<'s, R> {
    pub fn new(store: &'s Store) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub(crate) fn store(&self) -> &'s Store {
        self.store
    }

    /// Runs a `SELECT id, <columns> FROM <table> <tail>` and parses every row.
    pub(crate) fn query_where(
        &self,
        tail: &str,
        bind: impl IntoIterator<Item = Value>,
    ) -> PersistenceResult<Vec<R>> {
        let conn = self.store.conn()?;
        let mut stmt = conn.prepare(&format!("{} {tail}", select_sql::<R>()))?;
        let mut rows = stmt.query(params_from_iter(bind))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(R::from_row(row)?);
        }
        Ok(records)
    }

    /// `insert_with_id` without record validation, for putting back a
    /// captured row exactly as it was stored.
    pub(crate) fn restore(&self, record: &R) -> PersistenceResult<()> {
        self.write_with_id(record)
    }

    /// `update` without record validation, for putting back a captured row.
    pub(crate) fn restore_fields(&self, record: &R) -> PersistenceResult<()> {
        self.write_update(record)
    }

    fn write_with_id(&self, record: &R) -> PersistenceResult<()> {
        let id = record.id().ok_or(PersistenceError::MissingIdentity { entity: R::ENTITY })?;
        if self.exists(id)? {
            return Err(PersistenceError::IdentityOccupied {
                entity: R::ENTITY,
                id,
            });
        }

        let placeholders = placeholders(1, R::COLUMNS.len() + 1);
        let sql = format!(
            "INSERT INTO {} (id, {}) VALUES ({placeholders});",
            R::TABLE,
            R::COLUMNS.join(", ")
        );
        let mut values = Vec::with_capacity(R::COLUMNS.len() + 1);
        values.push(Value::Integer(id));
        values.extend(record.bind_values());
        self.execute_insert(&sql, values)?;
        self.store.mark_dirty();
        Ok(())
    }

    fn write_update(&self, record: &R) -> PersistenceResult<()> {
        let id = record.id().ok_or(PersistenceError::MissingIdentity { entity: R::ENTITY })?;

        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{};",
            R::TABLE,
            R::COLUMNS.len() + 1
        );
        let mut values = record.bind_values();
        values.push(Value::Integer(id));

        let changed = self.store.conn()?.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(PersistenceError::NotFound {
                entity: R::ENTITY,
                id,
            });
        }
        self.store.mark_dirty();
        Ok(())
    }

    fn execute_insert(&self, sql: &str, values: Vec<Value>) -> PersistenceResult<()> {
        let conn = self.store.conn()?;
        conn.execute(sql, params_from_iter(values))?;
        Ok(())
    }
}

impl<R: Record> Repository<R> for SqliteRepository<'_, R> {
    fn insert(&self, record: &R) -> PersistenceResult<EntityId> {
        if let Some(id) = record.id() {
            return Err(PersistenceError::UnexpectedIdentity {
                entity: R::ENTITY,
                id,
            });
        }
        record.validate()?;

        let placeholders = placeholders(1, R::COLUMNS.len());
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            R::TABLE,
            R::COLUMNS.join(", ")
        );
        self.execute_insert(&sql, record.bind_values())?;
        let id = self.store.conn()?.last_insert_rowid();
        self.store.mark_dirty();
        Ok(id)
    }

    fn insert_with_id(&self, record: &R) -> PersistenceResult<()> {
        record.validate()?;
        self.write_with_id(record)
    }

    fn get_by_id(&self, id: EntityId) -> PersistenceResult<Option<R>> {
        let mut records = self.query_where("WHERE id = ?1;", [Value::Integer(id)])?;
        Ok(records.pop())
    }

    fn get_all(&self) -> PersistenceResult<Vec<R>> {
        self.query_where(&format!("ORDER BY {};", R::ORDER_BY), [])
    }

    fn update(&self, record: &R) -> PersistenceResult<()> {
        record.validate()?;
        self.write_update(record)
    }

    fn delete(&self, id: EntityId) -> PersistenceResult<()> {
        let changed = self
            .store
            .conn()?
            .execute(&format!("DELETE FROM {} WHERE id = ?1;", R::TABLE), [id])?;
        if changed == 0 {
            return Err(PersistenceError::NotFound {
                entity: R::ENTITY,
                id,
            });
        }
        self.store.mark_dirty();
        Ok(())
    }

    fn exists(&self, id: EntityId) -> PersistenceResult<bool> {
        let exists: i64 = self.store.conn()?.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);", R::TABLE),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn select_sql<R: Record>() -> String {
    format!("SELECT id, {} FROM {}", R::COLUMNS.join(", "), R::TABLE)
}

fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}

pub(crate) fn optional_id(value: Option<EntityId>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

pub(crate) fn bool_value(value: bool) -> Value {
    Value::Integer(if value { 1 } else { 0 })
}

/// Appends the `(year, month, day)` column values of a date.
pub(crate) fn push_date(values: &mut Vec<Value>, date: Option<PartialDate>) {
    let (year, month, day) = PartialDate::to_columns(date);
    values.push(year.map_or(Value::Null, Value::Integer));
    values.push(month.map_or(Value::Null, Value::Integer));
    values.push(day.map_or(Value::Null, Value::Integer));
}

/// Reads `<prefix>_year/_month/_day`, accepting month names left by older files.
pub(crate) fn read_date(
    row: &Row<'_>,
    table: &str,
    prefix: &str,
) -> PersistenceResult<Option<PartialDate>> {
    let year: Option<i64> = row.get(format!("{prefix}_year").as_str())?;
    let month = match row.get::<_, Value>(format!("{prefix}_month").as_str())? {
        Value::Null => None,
        Value::Integer(month) => Some(month),
        Value::Text(month) => Some(month_from_text(&month).map(i64::from).ok_or_else(|| {
            PersistenceError::InvalidData(format!(
                "invalid month `{month}` in {table}.{prefix}_month"
            ))
        })?),
        other => {
            return Err(PersistenceError::InvalidData(format!(
                "invalid month {other:?} in {table}.{prefix}_month"
            )))
        }
    };
    let day: Option<i64> = row.get(format!("{prefix}_day").as_str())?;

    PartialDate::from_columns(year, month, day).map_err(|err: DateValidationError| {
        PersistenceError::InvalidData(format!("{table}.{prefix}: {err}"))
    })
}

pub(crate) fn read_bool(row: &Row<'_>, table: &str, column: &str) -> PersistenceResult<bool> {
    match row.get::<_, Option<i64>>(column)? {
        None | Some(0) => Ok(false),
        Some(1) => Ok(true),
        Some(other) => Err(PersistenceError::InvalidData(format!(
            "invalid boolean value `{other}` in {table}.{column}"
        ))),
    }
}
