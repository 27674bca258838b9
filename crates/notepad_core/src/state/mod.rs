//! Note screen state container.
//!
//! # Responsibility
//! - Define the immutable state snapshot rendered by the UI.
//! - Define the closed set of user intents and the pure reducer that maps
//!   `(state, event)` to the next snapshot plus persistence commands.
//!
//! # Invariants
//! - `reduce` never touches storage; side effects are returned as
//!   `Command`s for the view model to execute.
//! - `is_edit_mode` implies `note_id` is set.

mod events;
mod reducer;

pub use events::NoteEvent;
pub use reducer::{reduce, Clock, Command, SystemClock, Transition, EMPTY_NOTE_MESSAGE};

use crate::model::note::{Note, NoteId};
use crate::richtext::RichTextDocument;

/// Severity of a transient user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Input rejected by validation.
    Validation,
    /// Storage failure.
    Error,
}

/// Transient message shown to the user (snackbar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Validation,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Snapshot of the notes screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteState {
    /// Notes matching `selected_category`.
    pub notes: Vec<Note>,
    /// Distinct categories over all notes.
    pub categories: Vec<String>,

    // Editor sheet.
    pub note_id: Option<NoteId>,
    pub title: Option<String>,
    pub body: RichTextDocument,
    pub category: Option<String>,
    pub last_change: Option<String>,
    pub is_note_sheet_open: bool,
    pub is_edit_mode: bool,
    pub is_category_dialog_open: bool,
    pub is_color_picker_open: bool,

    // List screen.
    /// Category filter chip; `None` is "all notes".
    pub selected_category: Option<String>,
    pub is_dropdown_menu_open: bool,
    /// Note awaiting delete confirmation.
    pub pending_delete: Option<NoteId>,
    pub is_delete_dialog_open: bool,

    pub notification: Option<Notification>,
}

impl NoteState {
    /// Clears every editor field and closes the sheet and its dialogs.
    fn reset_editor(&mut self) {
        self.note_id = None;
        self.title = None;
        self.body = RichTextDocument::default();
        self.category = None;
        self.last_change = None;
        self.is_note_sheet_open = false;
        self.is_edit_mode = false;
        self.is_category_dialog_open = false;
        self.is_color_picker_open = false;
    }
}
