use notepad_core::db::open_db_in_memory;
use notepad_core::{LiveNoteRepository, Note, NoteListQuery, NoteRepository, SqliteNoteRepository};
use std::sync::{Arc, Mutex};

type Emissions<T> = Arc<Mutex<Vec<Vec<T>>>>;

fn titled(title: &str, category: Option<&str>) -> Note {
    let mut note = Note::new();
    note.title = Some(title.to_string());
    note.category = category.map(str::to_string);
    note
}

fn titles(emission: &[Note]) -> Vec<String> {
    let mut titles: Vec<String> = emission
        .iter()
        .filter_map(|note| note.title.clone())
        .collect();
    titles.sort();
    titles
}

#[test]
fn watch_notes_emits_current_result_then_after_each_write() {
    let conn = open_db_in_memory().unwrap();
    let mut live = LiveNoteRepository::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let seen: Emissions<Note> = Arc::default();

    let sink = Arc::clone(&seen);
    live.watch_notes(
        NoteListQuery::all(),
        Arc::new(move |notes: &[Note]| sink.lock().unwrap().push(notes.to_vec())),
    )
    .unwrap();

    let mut first = titled("first", None);
    live.insert_note(&first).unwrap();
    first.title = Some("renamed".to_string());
    live.update_note(&first).unwrap();
    live.delete_note(first.id).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen[0].is_empty());
    assert_eq!(titles(&seen[1]), vec!["first"]);
    assert_eq!(titles(&seen[2]), vec!["renamed"]);
    assert!(seen[3].is_empty());
}

#[test]
fn filtered_watch_only_sees_matching_category() {
    let conn = open_db_in_memory().unwrap();
    let mut live = LiveNoteRepository::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let seen: Emissions<Note> = Arc::default();

    let sink = Arc::clone(&seen);
    live.watch_notes(
        NoteListQuery::in_category("Work"),
        Arc::new(move |notes: &[Note]| sink.lock().unwrap().push(notes.to_vec())),
    )
    .unwrap();

    live.insert_note(&titled("standup", Some("Work"))).unwrap();
    live.insert_note(&titled("laundry", Some("Home"))).unwrap();

    let seen = seen.lock().unwrap();
    let last = seen.last().unwrap();
    assert_eq!(titles(last), vec!["standup"]);
}

#[test]
fn watch_categories_tracks_distinct_values() {
    let conn = open_db_in_memory().unwrap();
    let mut live = LiveNoteRepository::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let seen: Emissions<String> = Arc::default();

    let sink = Arc::clone(&seen);
    live.watch_categories(Arc::new(move |categories: &[String]| {
        sink.lock().unwrap().push(categories.to_vec())
    }))
    .unwrap();

    live.insert_note(&titled("a", Some("Work"))).unwrap();
    live.insert_note(&titled("b", Some("Work"))).unwrap();
    live.insert_note(&titled("c", Some("Home"))).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.first().unwrap(), &Vec::<String>::new());
    assert_eq!(
        seen.last().unwrap(),
        &vec!["Home".to_string(), "Work".to_string()]
    );
}

#[test]
fn unwatch_stops_notifications() {
    let conn = open_db_in_memory().unwrap();
    let mut live = LiveNoteRepository::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let seen: Emissions<Note> = Arc::default();

    let sink = Arc::clone(&seen);
    let watch_id = live
        .watch_notes(
            NoteListQuery::all(),
            Arc::new(move |notes: &[Note]| sink.lock().unwrap().push(notes.to_vec())),
        )
        .unwrap();
    assert_eq!(live.watch_count(), 1);

    assert!(live.unwatch(watch_id));
    assert!(!live.unwatch(watch_id));
    assert_eq!(live.watch_count(), 0);

    live.insert_note(&titled("unseen", None)).unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn failed_write_does_not_notify() {
    let conn = open_db_in_memory().unwrap();
    let mut live = LiveNoteRepository::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let seen: Emissions<Note> = Arc::default();

    let sink = Arc::clone(&seen);
    live.watch_notes(
        NoteListQuery::all(),
        Arc::new(move |notes: &[Note]| sink.lock().unwrap().push(notes.to_vec())),
    )
    .unwrap();

    assert!(live.update_note(&titled("missing", None)).is_err());
    assert!(live.insert_note(&Note::new()).is_err());
    assert_eq!(seen.lock().unwrap().len(), 1);
}
