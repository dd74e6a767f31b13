//! Several commands undone and redone as one step.

use super::Command;
use crate::repo::PersistenceResult;
use crate::store::Store;

/// Applies children in order and reverses them in reverse order.
///
/// Atomicity comes from the history manager running the whole batch in
/// one store transaction.
#[derive(Debug)]
pub struct Batch {
    label: String,
    commands: Vec<Command>,
}

impl Batch {
    pub fn new(label: impl Into<String>, commands: Vec<Command>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn apply(&mut self, store: &Store) -> PersistenceResult<()> {
        for command in &mut self.commands {
            command.apply(store)?;
        }
        Ok(())
    }

    pub(crate) fn reverse(&mut self, store: &Store) -> PersistenceResult<()> {
        for command in self.commands.iter_mut().rev() {
            command.reverse(store)?;
        }
        Ok(())
    }

    pub(crate) fn description(&self) -> String {
        self.label.clone()
    }
}
