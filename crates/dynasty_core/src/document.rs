//! Document file lifecycle.
//!
//! # Responsibility
//! - Create, open, save and close dynasty documents.
//! - Keep every edit in an in-memory working copy until the user saves.
//!
//! # Invariants
//! - A freshly created or opened document is clean.
//! - A successful save marks the document clean; a failed one changes nothing.

use crate::db::{load_db_into_memory, open_db_in_memory, write_db_to_path};
use crate::repo::{PersistenceError, PersistenceResult};
use crate::store::Store;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct Document {
    store: Store,
    path: Option<PathBuf>,
}

impl Document {
    /// Creates an empty document at `path`, replacing any file already there.
    pub fn create(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let path = path.as_ref();
        let conn = open_db_in_memory()?;
        write_db_to_path(&conn, path)?;
        info!("event=document_create module=document status=ok");
        Ok(Self {
            store: Store::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Loads an existing document file.
    pub fn open(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let path = path.as_ref();
        let conn = load_db_into_memory(path)?;
        Ok(Self {
            store: Store::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Empty document with no file behind it yet.
    pub fn untitled() -> PersistenceResult<Self> {
        Ok(Self {
            store: Store::new(open_db_in_memory()?),
            path: None,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn is_open(&self) -> bool {
        self.store.is_open()
    }

    /// Writes the working copy to the document's own path.
    pub fn save(&mut self) -> PersistenceResult<()> {
        let path = self.path.clone().ok_or(PersistenceError::NoDocumentPath)?;
        self.write_to(&path)
    }

    /// Writes the working copy to `path` and makes it the document's path.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        let path = path.as_ref();
        self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Drops the working copy without saving.
    pub fn close(&mut self) {
        let was_dirty = self.store.is_dirty();
        if self.store.close().is_some() {
            info!(
                "event=document_close module=document status=ok discarded_changes={}",
                was_dirty
            );
        }
    }

    fn write_to(&self, path: &Path) -> PersistenceResult<()> {
        let started_at = Instant::now();
        let conn = self.store.conn()?;
        if let Err(err) = write_db_to_path(conn, path) {
            error!(
                "event=document_save module=document status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
        self.store.mark_clean();
        info!(
            "event=document_save module=document status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
