use autousata_forms::storage::{
    records::{read_record, read_record_or, read_records, write_record},
    store::{FileStore, KeyValueStore, MemoryStore},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Note {
    text: String,
}

fn note(text: &str) -> Note {
    Note { text: text.into() }
}

// =========================================================================
// Record helpers
// =========================================================================

#[test]
fn missing_entity_falls_back_to_default() {
    let store = MemoryStore::new();
    let fallback = read_record_or(&store, "notes", "auction-1", note("default"));
    assert_eq!(fallback, note("default"));
}

#[test]
fn corrupt_key_is_treated_as_empty() {
    let store = MemoryStore::with_entries([("notes", "{not json")]);

    assert_eq!(read_record::<Note>(&store, "notes", "auction-1"), None);
    assert!(read_records::<Note>(&store, "notes").is_empty());
    assert_eq!(
        read_record_or(&store, "notes", "auction-1", note("default")),
        note("default")
    );
}

#[test]
fn malformed_entry_does_not_hide_the_others() {
    let store = MemoryStore::with_entries([(
        "notes",
        r#"{"a": {"text": "ok"}, "b": {"text": 42}, "c": "nonsense"}"#,
    )]);

    let all = read_records::<Note>(&store, "notes");
    assert_eq!(all.len(), 1);
    assert_eq!(all.get("a"), Some(&note("ok")));
    assert_eq!(read_record::<Note>(&store, "notes", "b"), None);
}

#[test]
fn write_record_keeps_other_entities() {
    let store = MemoryStore::new();
    write_record(&store, "notes", "a", &note("first")).unwrap();
    write_record(&store, "notes", "b", &note("second")).unwrap();
    write_record(&store, "notes", "a", &note("replaced")).unwrap();

    let all = read_records::<Note>(&store, "notes");
    assert_eq!(all.len(), 2);
    assert_eq!(all["a"], note("replaced"));
    assert_eq!(all["b"], note("second"));
}

#[test]
fn write_record_over_corrupt_value_starts_fresh() {
    let store = MemoryStore::with_entries([("notes", "garbage")]);
    write_record(&store, "notes", "a", &note("fresh")).unwrap();
    assert_eq!(read_record::<Note>(&store, "notes", "a"), Some(note("fresh")));
}

// =========================================================================
// Stores
// =========================================================================

#[test]
fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    assert!(store.is_empty());

    store.set("accessToken", "abc").unwrap();
    assert_eq!(store.get("accessToken").as_deref(), Some("abc"));

    store.remove("accessToken").unwrap();
    assert_eq!(store.get("accessToken"), None);
}

#[test]
fn file_store_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let store = FileStore::open(&path);
        store.set("AUTOUSATA:language", "en").unwrap();
        write_record(&store, "notes", "a", &note("kept")).unwrap();
    }

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get("AUTOUSATA:language").as_deref(), Some("en"));
    assert_eq!(read_record::<Note>(&reopened, "notes", "a"), Some(note("kept")));
}

#[test]
fn file_store_missing_or_corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();

    let missing = FileStore::open(dir.path().join("absent.json"));
    assert_eq!(missing.get("anything"), None);

    let corrupt_path = dir.path().join("corrupt.json");
    std::fs::write(&corrupt_path, "][").unwrap();
    let corrupt = FileStore::open(&corrupt_path);
    assert_eq!(corrupt.get("anything"), None);

    corrupt.set("k", "v").unwrap();
    assert_eq!(FileStore::open(&corrupt_path).get("k").as_deref(), Some("v"));
}

#[test]
fn file_store_reports_write_failures() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("no-such-dir").join("store.json"));

    assert!(store.set("k", "v").is_err());
    assert_eq!(store.get("k"), None, "Unsaved value must not be visible");
}

#[test]
fn file_store_failed_remove_keeps_value() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();

    let store = FileStore::open(sub.join("store.json"));
    store.set("accessToken", "abc").unwrap();

    std::fs::remove_dir_all(&sub).unwrap();
    assert!(store.remove("accessToken").is_err());
    assert_eq!(store.get("accessToken").as_deref(), Some("abc"));
}
