//! Note screen view model.
//!
//! # Responsibility
//! - Own the current `NoteState` and feed events through `reduce`.
//! - Execute reducer commands against a live repository.
//! - Turn live query results and storage failures back into events.
//! - Notify redraw listeners once per dispatched event.
//!
//! # Invariants
//! - Events are processed strictly in arrival order, including events
//!   emitted by live queries while a command executes.
//! - Storage errors never escape `dispatch`; they surface as notifications.
//! - The editor is only cleared after its write succeeded.

use crate::model::note::Note;
use crate::repo::live::{LiveNoteRepository, WatchId};
use crate::repo::note_repo::{NoteListQuery, NoteRepository, RepoResult};
use crate::state::{reduce, Clock, Command, NoteEvent, NoteState, SystemClock};
use log::{error, info};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback invoked with each new snapshot.
pub type RedrawListener = Box<dyn FnMut(&NoteState) + Send>;

type EventQueue = Arc<Mutex<VecDeque<NoteEvent>>>;

/// State holder bridging UI intents and persistence.
pub struct NoteViewModel<R: NoteRepository, C: Clock = SystemClock> {
    repo: LiveNoteRepository<R>,
    clock: C,
    state: NoteState,
    queue: EventQueue,
    notes_watch: Option<WatchId>,
    listeners: Vec<RedrawListener>,
}

impl<R: NoteRepository, C: Clock> NoteViewModel<R, C> {
    /// Creates a view model subscribed to all notes and to the category list.
    pub fn new(repo: R, clock: C) -> RepoResult<Self> {
        let mut view_model = Self {
            repo: LiveNoteRepository::new(repo),
            clock,
            state: NoteState::default(),
            queue: Arc::default(),
            notes_watch: None,
            listeners: Vec::new(),
        };

        let queue = Arc::clone(&view_model.queue);
        view_model
            .repo
            .watch_categories(Arc::new(move |categories: &[String]| {
                enqueue(&queue, NoteEvent::CategoriesLoaded(categories.to_vec()));
            }))?;
        view_model.watch_notes(None)?;
        view_model.drain();
        Ok(view_model)
    }

    pub fn state(&self) -> &NoteState {
        &self.state
    }

    /// Read access to the underlying repository.
    pub fn repository(&self) -> &LiveNoteRepository<R> {
        &self.repo
    }

    pub fn add_listener(&mut self, listener: RedrawListener) {
        self.listeners.push(listener);
    }

    /// Applies one event and everything it triggers, then redraws.
    pub fn dispatch(&mut self, event: NoteEvent) -> &NoteState {
        enqueue(&self.queue, event);
        self.drain();
        for listener in &mut self.listeners {
            listener(&self.state);
        }
        &self.state
    }

    fn drain(&mut self) {
        while let Some(event) = self.next_event() {
            let transition = reduce(&self.state, event, &self.clock);
            self.state = transition.state;
            for command in transition.commands {
                self.execute(command);
            }
        }
    }

    fn next_event(&self) -> Option<NoteEvent> {
        lock(&self.queue).pop_front()
    }

    fn execute(&mut self, command: Command) {
        let outcome = match command {
            Command::Insert(note) => self
                .repo
                .insert_note(&note)
                .map(|id| {
                    enqueue(&self.queue, NoteEvent::NoteSaved(id));
                    ("note_save", "insert")
                })
                .map_err(|err| ("note_save", format!("Could not save note: {err}"))),
            Command::Update(note) => self
                .repo
                .update_note(&note)
                .map(|()| {
                    enqueue(&self.queue, NoteEvent::NoteSaved(note.id));
                    ("note_save", "update")
                })
                .map_err(|err| ("note_save", format!("Could not save note: {err}"))),
            Command::Delete(id) => self
                .repo
                .delete_note(id)
                .map(|()| ("note_delete", "delete"))
                .map_err(|err| ("note_delete", format!("Could not delete note: {err}"))),
            Command::Watch(category) => {
                let filtered = category.is_some();
                self.watch_notes(category)
                    .map(|()| ("notes_watch", if filtered { "category" } else { "all" }))
                    .map_err(|err| ("notes_watch", format!("Could not load notes: {err}")))
            }
        };

        match outcome {
            Ok((event, mode)) => {
                info!("event={event} module=viewmodel status=ok mode={mode}");
            }
            Err((event, message)) => {
                error!("event={event} module=viewmodel status=error");
                enqueue(&self.queue, NoteEvent::PersistenceFailed(message));
            }
        }
    }

    /// Swaps the note list subscription. The previous one stays active
    /// when the new query fails.
    fn watch_notes(&mut self, category: Option<String>) -> RepoResult<()> {
        let queue = Arc::clone(&self.queue);
        let watch_id = self.repo.watch_notes(
            NoteListQuery { category },
            Arc::new(move |notes: &[Note]| {
                enqueue(&queue, NoteEvent::NotesLoaded(notes.to_vec()));
            }),
        )?;
        if let Some(previous) = self.notes_watch.replace(watch_id) {
            self.repo.unwatch(previous);
        }
        Ok(())
    }
}

fn enqueue(queue: &Mutex<VecDeque<NoteEvent>>, event: NoteEvent) {
    lock(queue).push_back(event);
}

fn lock(queue: &Mutex<VecDeque<NoteEvent>>) -> MutexGuard<'_, VecDeque<NoteEvent>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}
