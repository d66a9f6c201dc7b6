use super::*;
use tempfile::tempdir;

#[test]
fn memory_store_round_trips() {
    let mut store = MemoryStore::new();
    assert_eq!(store.get_item("k"), None);
    store.set_item("k", "v").unwrap();
    assert_eq!(store.get_item("k").as_deref(), Some("v"));
    store.set_item("k", "w").unwrap();
    assert_eq!(store.get_item("k").as_deref(), Some("w"));
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let mut store = FileStore::open(&path);
    assert_eq!(store.get_item("audioFiles"), None);
    store.set_item("audioFiles", "[]").unwrap();
    store.set_item("other", "x").unwrap();

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get_item("audioFiles").as_deref(), Some("[]"));
    assert_eq!(reopened.get_item("other").as_deref(), Some("x"));
}

#[test]
fn file_store_treats_corrupt_file_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{not json").unwrap();

    let mut store = FileStore::open(&path);
    assert_eq!(store.get_item("audioFiles"), None);

    // The next write replaces the corrupt file.
    store.set_item("audioFiles", "[]").unwrap();
    assert_eq!(
        FileStore::open(&path).get_item("audioFiles").as_deref(),
        Some("[]")
    );
}

#[test]
fn last_writer_wins_between_instances() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut first = FileStore::open(&path);
    let mut second = FileStore::open(&path);
    first.set_item("audioFiles", "first").unwrap();
    second.set_item("audioFiles", "second").unwrap();

    assert_eq!(
        FileStore::open(&path).get_item("audioFiles").as_deref(),
        Some("second")
    );
}
