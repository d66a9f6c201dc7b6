use super::*;
use std::fs;
use tempfile::tempdir;

fn blob_in(dir: &Path, name: &str) -> FileBlob {
    let path = dir.join(name);
    fs::write(&path, b"not real").unwrap();
    FileBlob::from_path(path)
}

#[test]
fn file_url_round_trips_through_percent_encoding() {
    let path = Path::new("/music/Café del Mar/01 #1 hit?.mp3");
    let url = file_url(path);
    assert_eq!(url, "file:///music/Caf%C3%A9%20del%20Mar/01%20%231%20hit%3F.mp3");
    assert_eq!(path_from_file_url(&url).unwrap(), path);
}

#[test]
fn path_from_file_url_rejects_other_schemes() {
    assert!(path_from_file_url("blob:http://localhost/1234").is_none());
    assert!(path_from_file_url("https://example.com/a.mp3").is_none());
}

#[test]
fn created_urls_resolve_until_revoked() {
    let dir = tempdir().unwrap();
    let urls = ObjectUrls::new();
    let blob = blob_in(dir.path(), "song one.mp3");

    let url = urls.create_object_url(&blob).unwrap();
    assert!(url.starts_with("file://"));
    assert_eq!(
        urls.resolve(&url).unwrap(),
        blob.path.canonicalize().unwrap()
    );

    urls.revoke_object_url(&url);
    assert!(urls.resolve(&url).is_none());
    assert_eq!(urls.live_count(), 0);
}

#[test]
fn duplicate_uploads_share_a_locator_until_both_revoke() {
    let dir = tempdir().unwrap();
    let urls = ObjectUrls::new();
    let blob = blob_in(dir.path(), "dup.mp3");

    let a = urls.create_object_url(&blob).unwrap();
    let b = urls.create_object_url(&blob).unwrap();
    assert_eq!(a, b);

    urls.revoke_object_url(&a);
    assert!(urls.resolve(&b).is_some());
    urls.revoke_object_url(&b);
    assert!(urls.resolve(&b).is_none());
}

#[test]
fn create_fails_for_missing_file() {
    let urls = ObjectUrls::new();
    let blob = FileBlob::from_path(PathBuf::from("/definitely/not/here.mp3"));
    assert!(matches!(
        urls.create_object_url(&blob),
        Err(ObjectUrlError::Resolve { .. })
    ));
}

#[test]
fn adopt_registers_existing_files_only() {
    let dir = tempdir().unwrap();
    let blob = blob_in(dir.path(), "kept.mp3");
    let url = file_url(&blob.path.canonicalize().unwrap());

    let urls = ObjectUrls::new();
    assert!(urls.adopt_object_url(&url));
    assert!(urls.resolve(&url).is_some());

    let gone = file_url(&dir.path().join("gone.mp3"));
    assert!(!urls.adopt_object_url(&gone));
    assert!(urls.resolve(&gone).is_none());
}

#[test]
fn clones_share_the_registry() {
    let dir = tempdir().unwrap();
    let urls = ObjectUrls::new();
    let shared = urls.clone();

    let url = urls.create_object_url(&blob_in(dir.path(), "a.mp3")).unwrap();
    assert!(shared.resolve(&url).is_some());
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_names_get_distinct_locators() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let first = dir.path().join(OsStr::from_bytes(b"a\xff.mp3"));
    let second = dir.path().join(OsStr::from_bytes(b"a\xfe.mp3"));
    fs::write(&first, b"first").unwrap();
    fs::write(&second, b"second").unwrap();

    let urls = ObjectUrls::new();
    let a = urls
        .create_object_url(&FileBlob::from_path(first.clone()))
        .unwrap();
    let b = urls
        .create_object_url(&FileBlob::from_path(second.clone()))
        .unwrap();
    assert_ne!(a, b);
    assert!(a.ends_with("/a%FF.mp3"));
    assert_eq!(urls.resolve(&a).unwrap(), first.canonicalize().unwrap());
    assert_eq!(urls.resolve(&b).unwrap(), second.canonicalize().unwrap());

    // A restart only has the stored locators to go on.
    let restarted = ObjectUrls::new();
    assert!(restarted.adopt_object_url(&a));
    assert!(restarted.adopt_object_url(&b));
    assert_eq!(fs::read(restarted.resolve(&b).unwrap()).unwrap(), b"second");
}
