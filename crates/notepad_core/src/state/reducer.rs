//! Pure `(state, event) -> state` transitions.

use super::{Notification, NoteEvent, NoteState};
use crate::model::note::{normalize_category, now_last_change, Note, NoteId};
use crate::richtext::RichTextDocument;

/// Message shown when a save has neither title nor body.
pub const EMPTY_NOTE_MESSAGE: &str = "Both Title and Body fields should not be left empty";

/// Source of `last_change` timestamps.
pub trait Clock {
    fn now(&self) -> String;
}

/// Local wall clock in the persisted `last_change` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        now_last_change()
    }
}

/// Persistence work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(Note),
    Update(Note),
    Delete(NoteId),
    /// Re-subscribe the note list with a category filter (`None` = all).
    Watch(Option<String>),
}

/// Result of one reducer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: NoteState,
    pub commands: Vec<Command>,
}

impl Transition {
    fn new(state: NoteState) -> Self {
        Self {
            state,
            commands: Vec::new(),
        }
    }

    fn with_command(state: NoteState, command: Command) -> Self {
        Self {
            state,
            commands: vec![command],
        }
    }
}

/// Maps one event onto the next snapshot.
///
/// Only `SaveNote`, `ConfirmDelete` and `SelectCategory` produce commands.
/// `SaveNote` is the only intent with validation. The editor keeps its
/// contents until the write is confirmed with `NoteSaved`.
pub fn reduce(state: &NoteState, event: NoteEvent, clock: &dyn Clock) -> Transition {
    let mut next = state.clone();
    match event {
        NoteEvent::TitleChanged(value) => next.title = Some(value),
        NoteEvent::BodyChanged(markup) => next.body = RichTextDocument::parse_html(&markup),
        NoteEvent::BodyTyped(text) => next.body.insert_text(&text),
        NoteEvent::CategoryChanged(value) => next.category = Some(value),
        NoteEvent::ClearCategory => next.category = None,

        NoteEvent::CreateNewNote => {
            next.reset_editor();
            next.is_note_sheet_open = true;
        }
        NoteEvent::NoteClicked(note) => {
            next.reset_editor();
            next.is_note_sheet_open = true;
            next.is_edit_mode = true;
            next.note_id = Some(note.id);
            next.title = note.title;
            next.body = note
                .body
                .as_deref()
                .map(RichTextDocument::parse_html)
                .unwrap_or_default();
            next.category = note.category;
            next.last_change = note.last_change;
        }
        NoteEvent::CloseNoteSheet => next.reset_editor(),
        NoteEvent::SaveNote => return save(next, clock),
        NoteEvent::NoteSaved(_) => next.reset_editor(),

        NoteEvent::OpenCategoryDialog => next.is_category_dialog_open = true,
        NoteEvent::CloseCategoryDialog => next.is_category_dialog_open = false,
        NoteEvent::OpenColorPicker => next.is_color_picker_open = true,
        NoteEvent::CloseColorPicker => next.is_color_picker_open = false,
        NoteEvent::PickColor(color) => {
            next.body.toggle_color(color);
            next.is_color_picker_open = false;
        }
        NoteEvent::ToggleSpan(toggle) => next.body.toggle_span(toggle),
        NoteEvent::SetAlignment(align) => next.body.set_alignment(align),
        NoteEvent::ToggleUnorderedList => next.body.toggle_unordered_list(),
        NoteEvent::ToggleOrderedList => next.body.toggle_ordered_list(),

        NoteEvent::OpenDropdownMenu => next.is_dropdown_menu_open = true,
        NoteEvent::CloseDropdownMenu => next.is_dropdown_menu_open = false,
        NoteEvent::SelectCategory(category) => {
            let category = normalize_category(category.as_deref());
            next.selected_category = category.clone();
            next.is_dropdown_menu_open = false;
            return Transition::with_command(next, Command::Watch(category));
        }

        NoteEvent::OpenDeleteDialog(id) => {
            next.pending_delete = Some(id);
            next.is_delete_dialog_open = true;
        }
        NoteEvent::CloseDeleteDialog => {
            next.pending_delete = None;
            next.is_delete_dialog_open = false;
        }
        NoteEvent::ConfirmDelete => {
            next.is_delete_dialog_open = false;
            if let Some(id) = next.pending_delete.take() {
                return Transition::with_command(next, Command::Delete(id));
            }
        }

        NoteEvent::DismissNotification => next.notification = None,

        NoteEvent::NotesLoaded(notes) => next.notes = notes,
        NoteEvent::CategoriesLoaded(categories) => next.categories = categories,
        NoteEvent::PersistenceFailed(message) => {
            next.notification = Some(Notification::error(message));
        }
    }
    Transition::new(next)
}

fn save(mut next: NoteState, clock: &dyn Clock) -> Transition {
    next.last_change = Some(clock.now());

    let title = next
        .title
        .clone()
        .filter(|title| !title.trim().is_empty());
    let body_blank = next.body.is_blank();
    if title.is_none() && body_blank {
        next.notification = Some(Notification::validation(EMPTY_NOTE_MESSAGE));
        return Transition::new(next);
    }

    let existing_id = next.note_id.filter(|_| next.is_edit_mode);
    let mut note = existing_id.map_or_else(Note::new, Note::with_id);
    note.title = title;
    note.body = (!body_blank).then(|| next.body.to_html());
    note.category = normalize_category(next.category.as_deref());
    note.last_change = next.last_change.clone();

    next.notification = None;
    let command = match existing_id {
        Some(_) => Command::Update(note),
        None => Command::Insert(note),
    };
    Transition::with_command(next, command)
}
