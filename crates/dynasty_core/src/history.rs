//! Undo/redo sequencing for one open document.
//!
//! # Responsibility
//! - Apply commands and keep them reversible in order.
//! - Report failed undo/redo distinctly from ordinary persistence failures.
//!
//! # Invariants
//! - `can_undo` ⇔ undo stack non-empty; `can_redo` ⇔ redo stack non-empty.
//! - A successful `execute` clears the redo stack.
//! - A failed `execute` leaves both stacks untouched.
//! - A failed `undo`/`redo` drops the command, clears both stacks and marks
//!   the history corrupted until `clear`.

use crate::command::Command;
use crate::repo::PersistenceError;
use crate::store::Store;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPhase {
    Undo,
    Redo,
}

impl HistoryPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

#[derive(Debug)]
pub enum HistoryError {
    /// Executing a new command failed; nothing changed.
    Persistence(PersistenceError),
    /// Undo or redo failed after the command left its stack. The remaining
    /// history can no longer be trusted and has been discarded.
    Corrupted {
        phase: HistoryPhase,
        command: String,
        source: PersistenceError,
    },
}

impl HistoryError {
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupted { .. })
    }
}

impl Display for HistoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "could not apply change: {err}"),
            Self::Corrupted {
                phase,
                command,
                source,
            } => write!(
                f,
                "{} of `{command}` failed, undo history discarded: {source}",
                phase.as_str()
            ),
        }
    }
}

impl Error for HistoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::Corrupted { source, .. } => Some(source),
        }
    }
}

impl From<PersistenceError> for HistoryError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Debug, Default)]
pub struct UndoRedoManager {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    corrupted: bool,
}

impl UndoRedoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `command` and makes it the next undo step.
    pub fn execute(&mut self, store: &Store, mut command: Command) -> HistoryResult<()> {
        let kind = command.kind();
        if let Err(err) = store.transaction(|store| command.apply(store)) {
            error!(
                "event=command_execute module=history status=error kind={} error={}",
                kind, err
            );
            return Err(err.into());
        }

        info!(
            "event=command_execute module=history status=ok kind={} undo_depth={}",
            kind,
            self.undo_stack.len() + 1
        );
        self.undo_stack.push(command);
        self.redo_stack.clear();
        Ok(())
    }

    /// Reverses the most recent command. `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, store: &Store) -> HistoryResult<bool> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };
        match store.transaction(|store| command.reverse(store)) {
            Ok(()) => {
                info!(
                    "event=command_undo module=history status=ok kind={}",
                    command.kind()
                );
                self.redo_stack.push(command);
                Ok(true)
            }
            Err(err) => Err(self.corrupt(HistoryPhase::Undo, &command, err)),
        }
    }

    /// Re-applies the most recently undone command. `Ok(false)` when there is
    /// nothing to redo.
    pub fn redo(&mut self, store: &Store) -> HistoryResult<bool> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        match store.transaction(|store| command.apply(store)) {
            Ok(()) => {
                info!(
                    "event=command_redo module=history status=ok kind={}",
                    command.kind()
                );
                self.undo_stack.push(command);
                Ok(true)
            }
            Err(err) => Err(self.corrupt(HistoryPhase::Redo, &command, err)),
        }
    }

    fn corrupt(
        &mut self,
        phase: HistoryPhase,
        command: &Command,
        source: PersistenceError,
    ) -> HistoryError {
        error!(
            "event=history_corrupted module=history status=error phase={} kind={} dropped_undo={} dropped_redo={} error={}",
            phase.as_str(),
            command.kind(),
            self.undo_stack.len(),
            self.redo_stack.len(),
            source
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.corrupted = true;
        HistoryError::Corrupted {
            phase,
            command: command.description(),
            source,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn peek_undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(Command::description)
    }

    pub fn peek_redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(Command::description)
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether an undo/redo failed since the last `clear`.
    pub fn is_corrupted(&self) -> bool {
        self.corrupted
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.corrupted = false;
    }
}
