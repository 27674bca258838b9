use notepad_core::db::open_db_in_memory;
use notepad_core::{
    Note, NoteListQuery, NoteRepository, NoteValidationError, RepoError, SqliteNoteRepository,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

fn note(title: &str, category: Option<&str>) -> Note {
    let mut note = Note::new();
    note.title = Some(title.to_string());
    note.body = Some(format!("<p>{title} body</p>"));
    note.category = category.map(str::to_string);
    note.last_change = Some("2026-10-18T15:04:05.000".to_string());
    note
}

fn set_updated_at(conn: &Connection, id: Uuid, updated_at: i64) {
    conn.execute(
        "UPDATE notes SET updated_at = ?1 WHERE id = ?2;",
        params![updated_at, id.to_string()],
    )
    .unwrap();
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let stored = note("groceries", Some("Home"));
    let id = repo.insert_note(&stored).unwrap();

    assert_eq!(id, stored.id);
    assert_eq!(repo.get_note(id).unwrap(), Some(stored));
}

#[test]
fn get_note_returns_none_for_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get_note(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn insert_with_existing_id_replaces_the_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let mut stored = note("first", None);
    repo.insert_note(&stored).unwrap();
    stored.title = Some("second".to_string());
    repo.insert_note(&stored).unwrap();

    let notes = repo.list_notes(&NoteListQuery::all()).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title.as_deref(), Some("second"));
}

#[test]
fn insert_rejects_empty_note() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let mut empty = Note::new();
    empty.title = Some("   ".to_string());
    empty.body = Some("<p><br></p>".to_string());

    let err = repo.insert_note(&empty).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::EmptyNote)
    ));
    assert!(repo.list_notes(&NoteListQuery::all()).unwrap().is_empty());
}

#[test]
fn update_changes_fields_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let mut stored = note("draft", Some("Work"));
    repo.insert_note(&stored).unwrap();

    stored.title = Some("final".to_string());
    stored.category = None;
    repo.update_note(&stored).unwrap();

    let loaded = repo.get_note(stored.id).unwrap().unwrap();
    assert_eq!(loaded.title.as_deref(), Some("final"));
    assert_eq!(loaded.category, None);
    assert_eq!(repo.list_notes(&NoteListQuery::all()).unwrap().len(), 1);
}

#[test]
fn update_unknown_note_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let missing = note("ghost", None);
    let err = repo.update_note(&missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing.id));
}

#[test]
fn delete_removes_only_the_target() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let keep = note("keep", None);
    let remove = note("remove", None);
    repo.insert_note(&keep).unwrap();
    repo.insert_note(&remove).unwrap();

    repo.delete_note(remove.id).unwrap();

    let ids: Vec<Uuid> = repo
        .list_notes(&NoteListQuery::all())
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(ids, vec![keep.id]);

    let err = repo.delete_note(remove.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn category_filter_matches_exactly_and_all_returns_everything() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let work = note("standup", Some("Work"));
    let lower = note("lowercase", Some("work"));
    let home = note("laundry", Some("Home"));
    let loose = note("loose", None);
    for item in [&work, &lower, &home, &loose] {
        repo.insert_note(item).unwrap();
    }

    let filtered = repo.list_notes(&NoteListQuery::in_category("Work")).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, work.id);

    assert_eq!(repo.list_notes(&NoteListQuery::all()).unwrap().len(), 4);
    assert!(repo
        .list_notes(&NoteListQuery::in_category("Travel"))
        .unwrap()
        .is_empty());
}

#[test]
fn list_orders_by_updated_at_desc_then_id() {
    let conn = open_db_in_memory().unwrap();
    let (older, newer) = {
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        let older = note("older", None);
        let newer = note("newer", None);
        repo.insert_note(&older).unwrap();
        repo.insert_note(&newer).unwrap();
        (older.id, newer.id)
    };

    set_updated_at(&conn, older, 1_000);
    set_updated_at(&conn, newer, 2_000);

    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let ids: Vec<Uuid> = repo
        .list_notes(&NoteListQuery::all())
        .unwrap()
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(ids, vec![newer, older]);
}

#[test]
fn categories_are_distinct_non_blank_and_sorted_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    for (title, category) in [
        ("a", Some("work")),
        ("b", Some("Home")),
        ("c", Some("work")),
        ("d", None),
        ("e", Some("  ")),
        ("f", Some("Errands")),
    ] {
        repo.insert_note(&note(title, category)).unwrap();
    }

    assert_eq!(
        repo.list_categories().unwrap(),
        vec!["Errands".to_string(), "Home".to_string(), "work".to_string()]
    );
}

#[test]
fn try_new_rejects_connection_without_notes_table() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn invalid_persisted_id_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO notes (id, title) VALUES ('not-a-uuid', 'broken');",
        [],
    )
    .unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo.list_notes(&NoteListQuery::all()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn note_serializes_with_plain_field_names() {
    let mut stored = note("json", Some("Work"));
    stored.id = Uuid::parse_str("6f1c1a52-0d2c-4d7b-9a7e-2f1c3b4d5e6f").unwrap();

    let value = serde_json::to_value(&stored).unwrap();
    assert_eq!(value["id"], "6f1c1a52-0d2c-4d7b-9a7e-2f1c3b4d5e6f");
    assert_eq!(value["title"], "json");
    assert_eq!(value["category"], "Work");
    assert_eq!(value["last_change"], "2026-10-18T15:04:05.000");

    let decoded: Note = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, stored);
}
