//! Working connection of one open document plus its dirty state.
//!
//! # Responsibility
//! - Hand repositories the live connection, or `StoreClosed` after close.
//! - Track whether the working copy diverges from the last save.
//! - Group several repository calls into one all-or-nothing transaction.
//!
//! # Invariants
//! - The dirty listener fires only when the flag actually changes.
//! - A rolled-back transaction leaves the dirty flag as it was before.

use crate::repo::{PersistenceError, PersistenceResult};
use log::debug;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::cell::{Cell, RefCell};

type DirtyListener = Box<dyn FnMut(bool)>;

pub struct Store {
    conn: Option<Connection>,
    dirty: Cell<bool>,
    listener: RefCell<Option<DirtyListener>>,
}

impl Store {
    /// Wraps an already bootstrapped connection. Starts clean.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Some(conn),
            dirty: Cell::new(false),
            listener: RefCell::new(None),
        }
    }

    pub fn conn(&self) -> PersistenceResult<&Connection> {
        self.conn.as_ref().ok_or(PersistenceError::StoreClosed)
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn mark_dirty(&self) {
        self.set_dirty(true);
    }

    pub fn mark_clean(&self) {
        self.set_dirty(false);
    }

    /// Registers the callback notified with the new value on every change.
    ///
    /// Replaces any previous listener.
    pub fn set_dirty_listener(&self, listener: impl FnMut(bool) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    pub fn clear_dirty_listener(&self) {
        *self.listener.borrow_mut() = None;
    }

    fn set_dirty(&self, value: bool) {
        if self.dirty.replace(value) == value {
            return;
        }
        debug!("event=dirty_changed module=store status=ok dirty={}", value);
        // A listener that re-enters the store is not notified recursively.
        if let Ok(mut listener) = self.listener.try_borrow_mut() {
            if let Some(listener) = listener.as_mut() {
                listener(value);
            }
        }
    }

    /// Runs `body` atomically.
    ///
    /// Nested calls join the outer transaction. On error everything `body`
    /// wrote is rolled back and the dirty flag is restored.
    pub fn transaction<T>(
        &self,
        body: impl FnOnce(&Store) -> PersistenceResult<T>,
    ) -> PersistenceResult<T> {
        let conn = self.conn()?;
        if !conn.is_autocommit() {
            return body(self);
        }

        let was_dirty = self.is_dirty();
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let outcome = body(self).and_then(|value| {
            tx.commit()?;
            Ok(value)
        });
        if outcome.is_err() {
            self.set_dirty(was_dirty);
        }
        outcome
    }

    /// Detaches the working connection; later calls fail with `StoreClosed`.
    pub(crate) fn close(&mut self) -> Option<Connection> {
        self.mark_clean();
        self.conn.take()
    }
}
