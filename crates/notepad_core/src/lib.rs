//! Core domain logic for the notepad app.
//! This crate is the single source of truth for note invariants and the
//! editor state machine.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod richtext;
pub mod runtime;
pub mod service;
pub mod state;
pub mod viewmodel;

pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::note::{format_last_change, Note, NoteId, NoteValidationError};
pub use repo::live::{LiveNoteRepository, WatchId};
pub use repo::note_repo::{
    NoteListQuery, NoteRepository, RepoError, RepoResult, SqliteNoteRepository,
};
pub use richtext::{RichTextDocument, SpanToggle, TextAlign, TextColor, COLOR_PALETTE};
pub use runtime::{NoteRuntime, RuntimeError};
pub use service::note_service::{NoteDraft, NoteService, NoteServiceError, NoteSummary};
pub use state::{reduce, Clock, Command, NoteEvent, NoteState, Notification, SystemClock};
pub use viewmodel::NoteViewModel;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
