//! One open document together with its undo history.
//!
//! Every UI-facing mutation goes through [`DocumentSession::execute`]; the
//! repository accessors are meant for reads.

use crate::command::Command;
use crate::document::Document;
use crate::history::{HistoryResult, UndoRedoManager};
use crate::repo::event_repo::EventRepository;
use crate::repo::family_repo::FamilyRepository;
use crate::repo::major_event_repo::MajorEventRepository;
use crate::repo::marriage_repo::MarriageRepository;
use crate::repo::person_repo::PersonRepository;
use crate::repo::portrait_repo::PortraitRepository;
use crate::repo::position_repo::PositionRepository;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::PersistenceResult;
use crate::store::Store;
use std::path::Path;

pub struct DocumentSession {
    document: Document,
    history: UndoRedoManager,
}

impl DocumentSession {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            history: UndoRedoManager::new(),
        }
    }

    pub fn create(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        Document::create(path).map(Self::new)
    }

    pub fn open(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        Document::open(path).map(Self::new)
    }

    pub fn untitled() -> PersistenceResult<Self> {
        Document::untitled().map(Self::new)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn store(&self) -> &Store {
        self.document.store()
    }

    pub fn history(&self) -> &UndoRedoManager {
        &self.history
    }

    pub fn path(&self) -> Option<&Path> {
        self.document.path()
    }

    pub fn execute(&mut self, command: Command) -> HistoryResult<()> {
        self.history.execute(self.document.store(), command)
    }

    pub fn undo(&mut self) -> HistoryResult<bool> {
        self.history.undo(self.document.store())
    }

    pub fn redo(&mut self) -> HistoryResult<bool> {
        self.history.redo(self.document.store())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.history.peek_undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.history.peek_redo_description()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    /// See [`Store::set_dirty_listener`].
    pub fn set_dirty_listener(&self, listener: impl FnMut(bool) + 'static) {
        self.document.store().set_dirty_listener(listener);
    }

    pub fn save(&mut self) -> PersistenceResult<()> {
        self.document.save()
    }

    pub fn save_as(&mut self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        self.document.save_as(path)
    }

    /// Discards unsaved changes and the history.
    pub fn close(&mut self) {
        self.history.clear();
        self.document.close();
    }

    pub fn people(&self) -> PersonRepository<'_> {
        PersonRepository::new(self.store())
    }

    pub fn marriages(&self) -> MarriageRepository<'_> {
        MarriageRepository::new(self.store())
    }

    pub fn events(&self) -> EventRepository<'_> {
        EventRepository::new(self.store())
    }

    pub fn portraits(&self) -> PortraitRepository<'_> {
        PortraitRepository::new(self.store())
    }

    pub fn families(&self) -> FamilyRepository<'_> {
        FamilyRepository::new(self.store())
    }

    pub fn major_events(&self) -> MajorEventRepository<'_> {
        MajorEventRepository::new(self.store())
    }

    pub fn positions(&self) -> PositionRepository<'_> {
        PositionRepository::new(self.store())
    }

    pub fn settings(&self) -> SettingsRepository<'_> {
        SettingsRepository::new(self.store())
    }
}
