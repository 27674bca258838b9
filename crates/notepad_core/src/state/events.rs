use crate::model::note::{Note, NoteId};
use crate::richtext::{SpanToggle, TextAlign, TextColor};

/// User intents and data-refresh notifications handled by `reduce`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    TitleChanged(String),
    /// Replaces the body with parsed markup.
    BodyChanged(String),
    /// Appends text to the body with the current typing style.
    BodyTyped(String),
    CategoryChanged(String),
    ClearCategory,

    CreateNewNote,
    NoteClicked(Note),
    CloseNoteSheet,
    /// Validates and persists the editor contents.
    SaveNote,
    /// The write requested by `SaveNote` succeeded; closes the editor.
    NoteSaved(NoteId),

    OpenCategoryDialog,
    CloseCategoryDialog,
    OpenColorPicker,
    CloseColorPicker,
    /// Toggles a text color and closes the picker.
    PickColor(TextColor),
    ToggleSpan(SpanToggle),
    SetAlignment(TextAlign),
    ToggleUnorderedList,
    ToggleOrderedList,

    OpenDropdownMenu,
    CloseDropdownMenu,
    /// Filter chip; `None` selects all notes.
    SelectCategory(Option<String>),

    OpenDeleteDialog(NoteId),
    CloseDeleteDialog,
    ConfirmDelete,

    DismissNotification,

    NotesLoaded(Vec<Note>),
    CategoriesLoaded(Vec<String>),
    PersistenceFailed(String),
}
