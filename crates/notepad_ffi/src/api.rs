//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note list/save/delete and category use-cases to Dart via FRB.
//! - Keep error semantics simple: envelopes carry `ok` plus a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Note ids cross the boundary as hyphenated UUID strings.
//! - Every call opens its own connection to the configured database.

use log::warn;
use notepad_core::db::open_db;
use notepad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, NoteDraft, NoteService, NoteSummary, SqliteNoteRepository, COLOR_PALETTE,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

static NOTES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Note card projection for the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: Option<String>,
    /// Stored rich-text markup, handed to the editor on tap.
    pub body: Option<String>,
    /// Plain-text excerpt of `body`.
    pub preview: Option<String>,
    pub category: Option<String>,
    /// Display text such as `October 18, 2026, 3:04 PM`.
    pub last_change: Option<String>,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    /// Category filter actually applied; `None` means all notes.
    pub applied_category: Option<String>,
    pub message: String,
}

/// Category list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoriesResponse {
    pub ok: bool,
    pub categories: Vec<String>,
    pub message: String,
}

/// Generic action response envelope for save/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Affected note id on success.
    pub note_id: Option<String>,
    /// Human-readable message for the snackbar.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: Uuid) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Color picker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorOption {
    pub name: String,
    /// `#RRGGBB`.
    pub hex: String,
}

/// Lists notes, optionally restricted to one category.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Blank `category` lists every note.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(category: Option<String>) -> NotesListResponse {
    notes_list_in(&resolve_notes_db_path(), category)
}

fn notes_list_in(db_path: &Path, category: Option<String>) -> NotesListResponse {
    let applied_category = category
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    match with_note_service(db_path, |service| {
        service
            .list_summaries(applied_category.as_deref())
            .map_err(|err| err.to_string())
    }) {
        Ok(summaries) => {
            let items = summaries.into_iter().map(to_note_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NotesListResponse {
                ok: true,
                items,
                applied_category,
                message,
            }
        }
        Err(err) => NotesListResponse {
            ok: false,
            items: Vec::new(),
            applied_category,
            message: format!("notes_list failed: {err}"),
        },
    }
}

/// Lists distinct categories over all notes.
#[flutter_rust_bridge::frb(sync)]
pub fn note_categories() -> CategoriesResponse {
    note_categories_in(&resolve_notes_db_path())
}

fn note_categories_in(db_path: &Path) -> CategoriesResponse {
    match with_note_service(db_path, |service| {
        service.list_categories().map_err(|err| err.to_string())
    }) {
        Ok(categories) => CategoriesResponse {
            ok: true,
            categories,
            message: String::new(),
        },
        Err(err) => CategoriesResponse {
            ok: false,
            categories: Vec::new(),
            message: format!("note_categories failed: {err}"),
        },
    }
}

/// Creates (`id=None`) or updates a note.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Rejects notes whose title and body are both blank.
/// - Never panics; returns the stored note id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(
    id: Option<String>,
    title: Option<String>,
    body: Option<String>,
    category: Option<String>,
) -> NoteActionResponse {
    note_save_in(&resolve_notes_db_path(), id, title, body, category)
}

fn note_save_in(
    db_path: &Path,
    id: Option<String>,
    title: Option<String>,
    body: Option<String>,
    category: Option<String>,
) -> NoteActionResponse {
    let id = match id.as_deref().map(parse_note_id).transpose() {
        Ok(id) => id,
        Err(err) => return NoteActionResponse::failure(err),
    };
    let draft = NoteDraft {
        id,
        title,
        body,
        category,
    };

    match with_note_service(db_path, |service| {
        service.save_note(draft).map_err(|err| err.to_string())
    }) {
        Ok(note) => NoteActionResponse::success("Note saved.", note.id),
        Err(err) => NoteActionResponse::failure(format!("note_save failed: {err}")),
    }
}

/// Deletes one note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(id: String) -> NoteActionResponse {
    note_delete_in(&resolve_notes_db_path(), id)
}

fn note_delete_in(db_path: &Path, id: String) -> NoteActionResponse {
    let note_id = match parse_note_id(&id) {
        Ok(note_id) => note_id,
        Err(err) => return NoteActionResponse::failure(err),
    };

    match with_note_service(db_path, |service| {
        service.delete_note(note_id).map_err(|err| err.to_string())
    }) {
        Ok(()) => NoteActionResponse::success("Note deleted.", note_id),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

/// Colors offered by the editor color picker.
#[flutter_rust_bridge::frb(sync)]
pub fn color_palette() -> Vec<ColorOption> {
    COLOR_PALETTE
        .iter()
        .map(|choice| ColorOption {
            name: choice.name.to_string(),
            hex: choice.color.to_hex(),
        })
        .collect()
}

fn parse_note_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid note id `{}`", raw.trim()))
}

fn resolve_notes_db_path() -> PathBuf {
    NOTES_DB_PATH
        .get_or_init(|| match AppConfig::from_env() {
            Ok(config) => config.db_path,
            Err(err) => {
                warn!("event=config_resolve module=ffi status=error error={err}");
                AppConfig::default().db_path
            }
        })
        .clone()
}

fn with_note_service<T>(
    db_path: &Path,
    f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("notes DB open failed: {err}"))?;
    let repo = SqliteNoteRepository::try_new(&conn)
        .map_err(|err| format!("notes repo init failed: {err}"))?;
    let service = NoteService::new(repo);
    f(&service)
}

fn to_note_item(summary: NoteSummary) -> NoteItem {
    NoteItem {
        id: summary.id.to_string(),
        title: summary.title,
        body: summary.body,
        preview: summary.preview,
        category: summary.category,
        last_change: summary.last_change,
    }
}
