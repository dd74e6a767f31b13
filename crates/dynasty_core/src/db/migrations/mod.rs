//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//! - Repair legacy data shapes that older dynasty files carry
//!   (month columns stored as month names, columns added after the file
//!   was written, NULL where text is now required).
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - All pending steps commit together or not at all.

use crate::db::{DbError, DbResult};
use crate::model::date::month_from_text;
use log::{info, warn};
use rusqlite::{params, Connection, Transaction};

#[derive(Clone, Copy)]
enum Step {
    Sql(&'static str),
    Data(fn(&Transaction<'_>) -> DbResult<()>),
}

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    step: Step,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        step: Step::Sql(include_str!("0001_init.sql")),
    },
    Migration {
        version: 2,
        step: Step::Sql(include_str!("0002_document_settings.sql")),
    },
    Migration {
        version: 3,
        step: Step::Data(normalize_month_columns),
    },
    Migration {
        version: 4,
        step: Step::Data(backfill_legacy_columns),
    },
];

/// Month columns per table that older files may hold as text.
const MONTH_COLUMNS: &[(&str, &[&str])] = &[
    (
        "Person",
        &["birth_month", "death_month", "arrival_month", "moved_out_month"],
    ),
    ("Marriage", &["marriage_month", "dissolution_month"]),
    ("Event", &["start_month", "end_month"]),
    ("Portrait", &["valid_from_month", "valid_to_month"]),
    ("Family", &["move_in_month"]),
    ("MajorEvent", &["start_month", "end_month"]),
];

/// Columns older files may lack, with the definition used to add them.
const LEGACY_COLUMNS: &[(&str, &str, &str)] = &[
    ("Person", "middle_name", "TEXT NOT NULL DEFAULT ''"),
    ("Person", "nickname", "TEXT NOT NULL DEFAULT ''"),
    ("Person", "dynasty_id", "INTEGER NOT NULL DEFAULT 1"),
    ("Person", "is_founder", "INTEGER NOT NULL DEFAULT 0"),
    ("Person", "education", "INTEGER NOT NULL DEFAULT 0"),
    ("Person", "is_favorite", "INTEGER NOT NULL DEFAULT 0"),
    ("Marriage", "notes", "TEXT NOT NULL DEFAULT ''"),
];

/// Columns older files may hold as NULL, with the value that replaces it.
const LEGACY_NULLS: &[(&str, &str, &str)] = &[
    ("Person", "middle_name", "''"),
    ("Person", "nickname", "''"),
    ("Person", "notes", "''"),
    ("Person", "dynasty_id", "1"),
    ("Person", "education", "0"),
    ("Marriage", "notes", "''"),
    ("Event", "notes", "''"),
    ("Family", "notes", "''"),
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        match migration.step {
            Step::Sql(sql) => tx.execute_batch(sql)?,
            Step::Data(run) => run(&tx)?,
        }
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Rewrites text month values (`"March"`, `"3"`) as integers.
///
/// Unrecognized text becomes NULL together with the day column of the same
/// date, keeping the precision ladder intact.
fn normalize_month_columns(tx: &Transaction<'_>) -> DbResult<()> {
    for (table, columns) in MONTH_COLUMNS {
        for column in *columns {
            let day_column = format!("{}_day", column.trim_end_matches("_month"));
            let mut stmt = tx.prepare(&format!(
                "SELECT id, {column} FROM {table} WHERE typeof({column}) = 'text';"
            ))?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;

            for (id, text) in rows {
                match month_from_text(&text) {
                    Some(month) => {
                        tx.execute(
                            &format!("UPDATE {table} SET {column} = ?1 WHERE id = ?2;"),
                            params![i64::from(month), id],
                        )?;
                    }
                    None => {
                        warn!(
                            "event=db_migrate module=db status=repair table={} column={} id={} action=clear_month",
                            table, column, id
                        );
                        tx.execute(
                            &format!(
                                "UPDATE {table} SET {column} = NULL, {day_column} = NULL WHERE id = ?1;"
                            ),
                            [id],
                        )?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Adds columns missing from older files and replaces legacy NULLs with
/// the defaults current rows carry.
fn backfill_legacy_columns(tx: &Transaction<'_>) -> DbResult<()> {
    for (table, column, definition) in LEGACY_COLUMNS {
        if table_columns(tx, table)?.iter().any(|name| name == column) {
            continue;
        }
        tx.execute_batch(&format!(
            "ALTER TABLE {table} ADD COLUMN {column} {definition};"
        ))?;
        info!(
            "event=db_migrate module=db status=repair table={} column={} action=add_column",
            table, column
        );
    }

    for (table, column, value) in LEGACY_NULLS {
        tx.execute(
            &format!("UPDATE {table} SET {column} = {value} WHERE {column} IS NULL;"),
            [],
        )?;
    }
    Ok(())
}

fn table_columns(tx: &Transaction<'_>, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = tx.prepare(&format!("PRAGMA table_info({table});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
