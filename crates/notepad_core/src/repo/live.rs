//! Live query registrations over a note repository.
//!
//! # Responsibility
//! - Let callers observe a note list (optionally filtered by category) or
//!   the category list as a sequence of results.
//! - Re-run every registered query after each successful write.
//!
//! # Invariants
//! - An observer receives the current result once on registration.
//! - Observers are only notified after the write has been persisted.
//! - A failed re-run is logged and never turns a persisted write into an
//!   error.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteListQuery, NoteRepository, RepoResult};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registration handle returned by `watch_*`.
pub type WatchId = u64;

/// Callback receiving note list results.
pub type NotesObserver = Arc<dyn Fn(&[Note]) + Send + Sync>;

/// Callback receiving category list results.
pub type CategoriesObserver = Arc<dyn Fn(&[String]) + Send + Sync>;

enum Watch {
    Notes {
        query: NoteListQuery,
        observer: NotesObserver,
    },
    Categories {
        observer: CategoriesObserver,
    },
}

/// Repository decorator that publishes live query results.
pub struct LiveNoteRepository<R: NoteRepository> {
    inner: R,
    watches: BTreeMap<WatchId, Watch>,
    next_watch_id: WatchId,
}

impl<R: NoteRepository> LiveNoteRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            watches: BTreeMap::new(),
            next_watch_id: 1,
        }
    }

    /// Registers a note list observer and emits the current result.
    pub fn watch_notes(
        &mut self,
        query: NoteListQuery,
        observer: NotesObserver,
    ) -> RepoResult<WatchId> {
        let notes = self.inner.list_notes(&query)?;
        observer(&notes);
        Ok(self.register(Watch::Notes { query, observer }))
    }

    /// Registers a category list observer and emits the current result.
    pub fn watch_categories(&mut self, observer: CategoriesObserver) -> RepoResult<WatchId> {
        let categories = self.inner.list_categories()?;
        observer(&categories);
        Ok(self.register(Watch::Categories { observer }))
    }

    /// Removes a registration. Returns `false` for unknown ids.
    pub fn unwatch(&mut self, watch_id: WatchId) -> bool {
        self.watches.remove(&watch_id).is_some()
    }

    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    fn register(&mut self, watch: Watch) -> WatchId {
        let watch_id = self.next_watch_id;
        self.next_watch_id += 1;
        self.watches.insert(watch_id, watch);
        debug!("event=live_watch module=repo status=ok watch_id={watch_id}");
        watch_id
    }

    fn publish(&self, operation: &'static str) {
        if let Err(err) = self.try_publish() {
            warn!(
                "event=live_publish module=repo status=error operation={operation} watches={} error={}",
                self.watches.len(),
                err
            );
        }
    }

    fn try_publish(&self) -> RepoResult<()> {
        let mut categories: Option<Vec<String>> = None;
        for watch in self.watches.values() {
            match watch {
                Watch::Notes { query, observer } => {
                    let notes = self.inner.list_notes(query)?;
                    observer(&notes);
                }
                Watch::Categories { observer } => {
                    if categories.is_none() {
                        categories = Some(self.inner.list_categories()?);
                    }
                    observer(categories.as_deref().unwrap_or_default());
                }
            }
        }
        Ok(())
    }
}

impl<R: NoteRepository> NoteRepository for LiveNoteRepository<R> {
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        self.inner.list_notes(query)
    }

    fn list_categories(&self) -> RepoResult<Vec<String>> {
        self.inner.list_categories()
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.inner.get_note(id)
    }

    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        let id = self.inner.insert_note(note)?;
        self.publish("insert");
        Ok(id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        self.inner.update_note(note)?;
        self.publish("update");
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        self.inner.delete_note(id)?;
        self.publish("delete");
        Ok(())
    }
}
