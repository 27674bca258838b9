use notepad_core::db::open_db;
use notepad_core::{NoteEvent, NoteListQuery, NoteRepository, NoteRuntime, NoteState, SqliteNoteRepository};
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn runtime_publishes_snapshots_and_persists_on_worker_thread() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notepad.sqlite3");
    let (snapshots, received) = mpsc::channel::<NoteState>();

    let runtime = NoteRuntime::spawn(&path, move |state: &NoteState| {
        let _ = snapshots.send(state.clone());
    })
    .unwrap();

    let initial = received.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(initial.notes.is_empty());

    runtime.send(NoteEvent::CreateNewNote).unwrap();
    runtime
        .send(NoteEvent::TitleChanged("from worker".to_string()))
        .unwrap();
    runtime.send(NoteEvent::SaveNote).unwrap();
    runtime.shutdown().unwrap();

    let last = received.try_iter().last().unwrap();
    assert_eq!(last.notes.len(), 1);
    assert_eq!(last.notes[0].title.as_deref(), Some("from worker"));

    let conn = open_db(&path).unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    assert_eq!(repo.list_notes(&NoteListQuery::all()).unwrap().len(), 1);
}

#[test]
fn runtime_reports_startup_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-parent").join("notepad.sqlite3");

    let result = NoteRuntime::spawn(&path, |_: &NoteState| {});
    assert!(result.is_err());
}
