use super::model::{FileBlob, Track};
use std::path::PathBuf;

#[test]
fn blob_name_is_the_file_name_with_extension() {
    let blob = FileBlob::from_path(PathBuf::from("/music/Artist - Song.flac"));
    assert_eq!(blob.name, "Artist - Song.flac");
    assert_eq!(blob.path, PathBuf::from("/music/Artist - Song.flac"));
}

#[test]
fn track_serializes_as_url_and_name() {
    let track = Track {
        url: "file:///music/a.mp3".into(),
        name: "a.mp3".into(),
    };
    let json = serde_json::to_string(&track).unwrap();
    assert_eq!(json, r#"{"url":"file:///music/a.mp3","name":"a.mp3"}"#);
}
