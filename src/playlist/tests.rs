use super::*;
use crate::library::FileBlob;
use crate::object_url::{ObjectUrlProvider, ObjectUrls, file_url};
use crate::store::{FileStore, MemoryStore, StoreError};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::tempdir;

/// Store handle the test can keep looking into after the playlist owns it.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl PersistentStore for SharedStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.0.borrow().get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().set_item(key, value)
    }
}

struct FailingStore;

impl PersistentStore for FailingStore {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }
}

fn track(name: &str) -> Track {
    Track {
        url: format!("file:///music/{name}"),
        name: name.to_string(),
    }
}

#[test]
fn append_reports_previous_emptiness_and_keeps_order() {
    let mut playlist = PlaylistState::new(Box::new(MemoryStore::new()), DEFAULT_PLAYLIST_KEY);
    assert!(playlist.append(vec![track("a.mp3"), track("b.mp3")]));
    assert!(!playlist.append(vec![track("c.mp3"), track("a.mp3")]));

    let names: Vec<&str> = playlist.tracks().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["a.mp3", "b.mp3", "c.mp3", "a.mp3"]);
    assert_eq!(playlist.len(), 4);
    assert_eq!(playlist.get(2).unwrap().name, "c.mp3");
}

#[test]
fn append_persists_json_array_under_key() {
    let store = SharedStore::default();
    let mut playlist = PlaylistState::new(Box::new(store.clone()), "audioFiles");
    playlist.append(vec![track("a.mp3")]);

    let raw = store.get_item("audioFiles").unwrap();
    assert_eq!(raw, r#"[{"url":"file:///music/a.mp3","name":"a.mp3"}]"#);
}

#[test]
fn empty_append_does_not_write() {
    let store = SharedStore::default();
    let mut playlist = PlaylistState::new(Box::new(store.clone()), "audioFiles");
    assert!(playlist.append(Vec::new()));
    assert!(store.get_item("audioFiles").is_none());
}

#[test]
fn persist_then_load_round_trips_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let urls = ObjectUrls::new();

    let tracks = vec![track("b.mp3"), track("a.mp3"), track("b.mp3")];
    {
        let mut playlist = PlaylistState::new(Box::new(FileStore::open(&path)), "audioFiles");
        playlist.append(tracks.clone());
    }

    let mut reloaded = PlaylistState::new(Box::new(FileStore::open(&path)), "audioFiles");
    assert_eq!(reloaded.load(&urls), LoadOutcome::Restored(3));
    assert_eq!(reloaded.tracks(), tracks.as_slice());
}

#[test]
fn load_without_data_is_a_no_op() {
    let urls = ObjectUrls::new();
    let mut playlist = PlaylistState::new(Box::new(MemoryStore::new()), "audioFiles");
    assert_eq!(playlist.load(&urls), LoadOutcome::Absent);
    assert!(playlist.is_empty());
}

#[test]
fn malformed_payload_yields_empty_playlist() {
    let urls = ObjectUrls::new();
    let mut store = MemoryStore::new();
    store.set_item("audioFiles", "{not json").unwrap();

    let mut playlist = PlaylistState::new(Box::new(store), "audioFiles");
    assert_eq!(playlist.load(&urls), LoadOutcome::Malformed);
    assert!(playlist.is_empty());
}

#[test]
fn incompatible_shape_is_malformed() {
    let urls = ObjectUrls::new();
    let mut store = MemoryStore::new();
    store.set_item("audioFiles", r#"[{"path":"/a.mp3"}]"#).unwrap();

    let mut playlist = PlaylistState::new(Box::new(store), "audioFiles");
    assert_eq!(playlist.load(&urls), LoadOutcome::Malformed);
    assert!(playlist.is_empty());
}

#[test]
fn load_adopts_restored_locators_and_release_revokes_them() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("song.mp3");
    std::fs::write(&song, b"not real").unwrap();
    let url = file_url(&song.canonicalize().unwrap());

    let mut store = MemoryStore::new();
    let payload = serde_json::to_string(&vec![Track {
        url: url.clone(),
        name: "song.mp3".into(),
    }])
    .unwrap();
    store.set_item("audioFiles", &payload).unwrap();

    let urls = ObjectUrls::new();
    let mut playlist = PlaylistState::new(Box::new(store), "audioFiles");
    playlist.load(&urls);
    assert!(urls.resolve(&url).is_some());

    playlist.release(&urls);
    assert!(urls.resolve(&url).is_none());
    assert_eq!(playlist.len(), 1);
}

#[test]
fn uploaded_locators_are_released() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("up.mp3");
    std::fs::write(&song, b"not real").unwrap();

    let urls = ObjectUrls::new();
    let url = urls
        .create_object_url(&FileBlob::from_path(song))
        .unwrap();
    let mut playlist = PlaylistState::new(Box::new(MemoryStore::new()), "audioFiles");
    playlist.append(vec![Track {
        url: url.clone(),
        name: "up.mp3".into(),
    }]);

    playlist.release(&urls);
    assert_eq!(urls.live_count(), 0);
}

#[test]
fn failing_store_does_not_lose_in_memory_tracks() {
    let mut playlist = PlaylistState::new(Box::new(FailingStore), "audioFiles");
    playlist.append(vec![track("a.mp3")]);
    assert_eq!(playlist.len(), 1);
}
