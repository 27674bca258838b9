//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record persisted by the repository.
//! - Own the "title and body must not both be empty" rule.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `body` holds rich-text markup; emptiness is judged on its plain text.
//! - A blank `category` is stored as `None`.

use crate::richtext::RichTextDocument;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = Uuid;

/// Default character budget for list previews.
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Storage format of `Note::last_change` (local time, millisecond precision).
pub const LAST_CHANGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

const LAST_CHANGE_DISPLAY_FORMAT: &str = "%B %-d, %Y, %-I:%M %p";

/// User-authored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: Option<String>,
    /// Rich-text markup produced by [`RichTextDocument::to_html`].
    pub body: Option<String>,
    pub category: Option<String>,
    /// Local timestamp text, see [`LAST_CHANGE_FORMAT`].
    pub last_change: Option<String>,
}

/// Validation error for note writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title and body plain text are both blank.
    EmptyNote,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "title and body must not both be empty"),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates an empty note with a freshly generated id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates an empty note with a caller-provided id.
    pub fn with_id(id: NoteId) -> Self {
        Self {
            id,
            title: None,
            body: None,
            category: None,
            last_change: None,
        }
    }

    /// Returns whether the title carries any non-whitespace text.
    pub fn has_title(&self) -> bool {
        self.title
            .as_deref()
            .is_some_and(|title| !title.trim().is_empty())
    }

    /// Returns the plain text of the body markup.
    pub fn body_text(&self) -> String {
        self.body
            .as_deref()
            .map(|markup| RichTextDocument::parse_html(markup).plain_text())
            .unwrap_or_default()
    }

    /// Returns whether both title and body are blank.
    pub fn is_empty(&self) -> bool {
        !self.has_title() && self.body_text().trim().is_empty()
    }

    /// Checks write invariants.
    ///
    /// # Errors
    /// - `EmptyNote` when title and body plain text are both blank.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.is_empty() {
            return Err(NoteValidationError::EmptyNote);
        }
        Ok(())
    }

    /// Whitespace-normalized body text capped at `max_chars` characters.
    ///
    /// Returns `None` when the body has no visible text.
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        let text = self.body_text();
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return None;
        }
        Some(normalized.chars().take(max_chars).collect())
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

/// Trims a category and maps blank input to `None`.
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Current local time in [`LAST_CHANGE_FORMAT`].
pub fn now_last_change() -> String {
    Local::now().format(LAST_CHANGE_FORMAT).to_string()
}

/// Renders a stored `last_change` value for display, e.g.
/// `October 18, 2026, 3:04 PM`.
///
/// Accepts timestamps with or without fractional seconds. Returns `None`
/// for anything else.
pub fn format_last_change(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .ok()?;
    Some(parsed.format(LAST_CHANGE_DISPLAY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_last_change, normalize_category, Note, NoteValidationError};

    #[test]
    fn new_notes_get_distinct_ids() {
        assert_ne!(Note::new().id, Note::new().id);
    }

    #[test]
    fn validate_rejects_blank_title_and_markup_only_body() {
        let mut note = Note::new();
        note.title = Some("   ".to_string());
        note.body = Some("<p><b></b><br></p>".to_string());
        assert_eq!(note.validate(), Err(NoteValidationError::EmptyNote));
    }

    #[test]
    fn validate_accepts_title_only_or_body_only() {
        let mut titled = Note::new();
        titled.title = Some("Groceries".to_string());
        assert!(titled.validate().is_ok());

        let mut bodied = Note::new();
        bodied.body = Some("<p>milk</p>".to_string());
        assert!(bodied.validate().is_ok());
    }

    #[test]
    fn preview_normalizes_whitespace_and_caps_length() {
        let mut note = Note::new();
        note.body = Some("<p>first   line</p><p>second line</p>".to_string());
        assert_eq!(note.preview(100).as_deref(), Some("first line second line"));
        assert_eq!(note.preview(5).as_deref(), Some("first"));
    }

    #[test]
    fn normalize_category_maps_blank_to_none() {
        assert_eq!(normalize_category(Some("  ")), None);
        assert_eq!(normalize_category(Some(" Work ")).as_deref(), Some("Work"));
        assert_eq!(normalize_category(None), None);
    }

    #[test]
    fn format_last_change_renders_long_date_short_time() {
        assert_eq!(
            format_last_change("2026-10-18T15:04:05.123").as_deref(),
            Some("October 18, 2026, 3:04 PM")
        );
        assert_eq!(
            format_last_change("2024-01-02T09:30").as_deref(),
            Some("January 2, 2024, 9:30 AM")
        );
        assert_eq!(format_last_change("yesterday"), None);
    }
}
