//! Note use-case service.
//!
//! # Responsibility
//! - Provide save (create-or-update), get, list, delete and category APIs.
//! - Normalize user input (blank title, body and category become `None`).
//! - Build list summaries with plain-text previews and display timestamps.
//!
//! # Invariants
//! - A draft without id always creates a note with a fresh id.
//! - A draft with id only ever updates that note.
//! - Every successful save stamps `last_change`.

use crate::model::note::{
    format_last_change, normalize_category, now_last_change, Note, NoteId, NoteValidationError,
    DEFAULT_PREVIEW_CHARS,
};
use crate::repo::note_repo::{NoteListQuery, NoteRepository, RepoError, RepoResult};
use crate::richtext::RichTextDocument;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Title and body are both empty.
    EmptyNote,
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "{}", NoteValidationError::EmptyNote),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(NoteValidationError::EmptyNote) => Self::EmptyNote,
            other => Self::Repo(other),
        }
    }
}

/// Save request. `id: None` creates a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub id: Option<NoteId>,
    pub title: Option<String>,
    /// Rich-text markup.
    pub body: Option<String>,
    pub category: Option<String>,
}

/// List projection for note cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: Option<String>,
    /// Stored rich-text markup.
    pub body: Option<String>,
    /// Plain-text body excerpt.
    pub preview: Option<String>,
    pub category: Option<String>,
    /// Human-readable `last_change`, e.g. `October 18, 2026, 3:04 PM`.
    pub last_change: Option<String>,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            body: note.body.clone(),
            preview: note.preview(DEFAULT_PREVIEW_CHARS),
            category: note.category.clone(),
            last_change: note.last_change.as_deref().and_then(format_last_change),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates or updates a note and returns the stored record.
    ///
    /// # Errors
    /// - `EmptyNote` when title and body are both blank.
    /// - `NoteNotFound` when `draft.id` does not match a stored note.
    pub fn save_note(&self, draft: NoteDraft) -> Result<Note, NoteServiceError> {
        let mut note = match draft.id {
            Some(id) => Note::with_id(id),
            None => Note::new(),
        };
        note.title = draft.title.filter(|title| !title.trim().is_empty());
        note.body = draft
            .body
            .filter(|markup| !RichTextDocument::parse_html(markup).is_blank());
        note.category = normalize_category(draft.category.as_deref());
        note.last_change = Some(now_last_change());

        let mode = if draft.id.is_some() {
            self.repo.update_note(&note)?;
            "update"
        } else {
            self.repo.insert_note(&note)?;
            "insert"
        };
        info!("event=note_save module=service status=ok mode={mode}");

        self.repo
            .get_note(note.id)?
            .ok_or(NoteServiceError::InconsistentState(
                "saved note not found in read-back",
            ))
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    /// Lists notes in one category, or all notes for `None`/blank input.
    pub fn list_notes(&self, category: Option<&str>) -> RepoResult<Vec<Note>> {
        let query = NoteListQuery {
            category: normalize_category(category),
        };
        self.repo.list_notes(&query)
    }

    /// Same as `list_notes`, projected for list display.
    pub fn list_summaries(&self, category: Option<&str>) -> RepoResult<Vec<NoteSummary>> {
        Ok(self
            .list_notes(category)?
            .iter()
            .map(NoteSummary::from)
            .collect())
    }

    /// Distinct categories over all notes.
    pub fn list_categories(&self) -> RepoResult<Vec<String>> {
        self.repo.list_categories()
    }

    /// Deletes one note.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok");
        Ok(())
    }
}
