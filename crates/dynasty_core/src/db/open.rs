//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//! - Copy whole documents between disk and the in-memory working copy.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::backup::Progress;
use rusqlite::{Connection, DatabaseName};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file in place and applies all pending migrations.
///
/// Edits made through this connection hit the file directly; document
/// sessions use [`load_db_into_memory`] instead.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let mut conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(&mut conn, "file", started_at)?;
    Ok(conn)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let mut conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(&mut conn, "memory", started_at)?;
    Ok(conn)
}

/// Loads a document file into a fresh in-memory working connection.
///
/// The file itself is only read; migrations run against the working copy
/// and reach disk on the next save.
///
/// # Errors
/// - `DbError::MissingFile` when `path` does not exist.
/// - `DbError::UnsupportedSchemaVersion` when the file is newer than this build.
pub fn load_db_into_memory(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=load");

    if !path.is_file() {
        error!(
            "event=db_open module=db status=error mode=load duration_ms={} error_code=db_missing_file",
            started_at.elapsed().as_millis()
        );
        return Err(DbError::MissingFile(path.to_path_buf()));
    }

    let mut conn = Connection::open_in_memory()?;
    if let Err(err) = conn.restore(DatabaseName::Main, path, None::<fn(Progress)>) {
        error!(
            "event=db_open module=db status=error mode=load duration_ms={} error_code=db_restore_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    finish_open(&mut conn, "load", started_at)?;
    Ok(conn)
}

/// Writes a full snapshot of `conn` to `path`, replacing its contents.
///
/// # Side effects
/// - Creates or overwrites the target file.
/// - Emits `db_snapshot` logging events with duration and status.
pub fn write_db_to_path(conn: &Connection, path: impl AsRef<Path>) -> DbResult<()> {
    let started_at = Instant::now();
    match conn.backup(DatabaseName::Main, path, None) {
        Ok(()) => {
            info!(
                "event=db_snapshot module=db status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=db_snapshot module=db status=error duration_ms={} error_code=db_backup_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn finish_open(conn: &mut Connection, mode: &str, started_at: Instant) -> DbResult<()> {
    match bootstrap_connection(conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
