//! Core domain logic for the dynasty manager.
//! This crate is the single source of truth for genealogy data invariants:
//! document storage, repositories, reversible commands and undo history.

pub mod command;
pub mod db;
pub mod document;
pub mod history;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod session;
pub mod store;

pub use command::Command;
pub use document::Document;
pub use history::{HistoryError, HistoryPhase, HistoryResult, UndoRedoManager};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::date::{DateValidationError, MonthStyle, PartialDate};
pub use model::event::Event;
pub use model::family::Family;
pub use model::major_event::MajorEvent;
pub use model::marriage::Marriage;
pub use model::person::{Gender, ParentRole, Person};
pub use model::portrait::Portrait;
pub use model::position::PersonPosition;
pub use model::{EntityId, PersonId, RecordValidationError};
pub use repo::{PersistenceError, PersistenceResult, Record, Repository, SqliteRepository};
pub use search::{normalize_for_search, search_people};
pub use session::DocumentSession;
pub use store::Store;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
