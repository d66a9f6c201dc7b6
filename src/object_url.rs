//! Object URLs: the locators uploaded files are known by.
//!
//! A locator is a `file://` URL of the canonical path. The registry keeps a
//! reference count per locator; once every holder has revoked it the locator
//! stops resolving, which is what the audio thread checks before opening a
//! file. Locators survive restarts, so tracks restored from storage are
//! re-adopted instead of re-created.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::library::FileBlob;

/// Converts uploaded files into dereferenceable locators and releases them.
pub trait ObjectUrlProvider {
    fn create_object_url(&self, blob: &FileBlob) -> Result<String, ObjectUrlError>;
    fn revoke_object_url(&self, url: &str);
    /// Re-register a locator restored from storage.
    ///
    /// Returns `false` when it no longer points at a readable file; the
    /// locator is left unregistered in that case.
    fn adopt_object_url(&self, url: &str) -> bool;
}

#[derive(Debug, Error)]
pub enum ObjectUrlError {
    #[error("cannot resolve {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shared registry of live locators. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrls {
    live: Arc<Mutex<HashMap<String, LiveUrl>>>,
}

#[derive(Debug)]
struct LiveUrl {
    path: PathBuf,
    holders: usize,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path behind a live locator, or `None` once it has been revoked.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        self.live
            .lock()
            .ok()
            .and_then(|live| live.get(url).map(|l| l.path.clone()))
    }

    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }

    fn register(&self, url: String, path: PathBuf) {
        if let Ok(mut live) = self.live.lock() {
            live.entry(url)
                .or_insert(LiveUrl { path, holders: 0 })
                .holders += 1;
        }
    }
}

impl ObjectUrlProvider for ObjectUrls {
    fn create_object_url(&self, blob: &FileBlob) -> Result<String, ObjectUrlError> {
        let path = blob
            .path
            .canonicalize()
            .map_err(|source| ObjectUrlError::Resolve {
                path: blob.path.clone(),
                source,
            })?;
        let url = file_url(&path);
        self.register(url.clone(), path);
        Ok(url)
    }

    fn revoke_object_url(&self, url: &str) {
        if let Ok(mut live) = self.live.lock() {
            if let Some(entry) = live.get_mut(url) {
                entry.holders = entry.holders.saturating_sub(1);
                if entry.holders == 0 {
                    live.remove(url);
                }
            }
        }
    }

    fn adopt_object_url(&self, url: &str) -> bool {
        match path_from_file_url(url) {
            Some(path) if path.is_file() => {
                self.register(url.to_string(), path);
                true
            }
            _ => false,
        }
    }
}

/// Build a `file://` URL, percent-encoding each path segment byte for byte
/// so that distinct non-UTF-8 names stay distinct.
pub fn file_url(path: &Path) -> String {
    let bytes = path_bytes(path);
    let encoded: Vec<String> = bytes
        .split(|b| *b == b'/')
        .map(|segment| urlencoding::encode_binary(segment).into_owned())
        .collect();
    format!("file://{}", encoded.join("/"))
}

/// Inverse of [`file_url`]. `None` for other schemes.
pub fn path_from_file_url(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("file://")?;
    let decoded: Vec<Vec<u8>> = rest
        .split('/')
        .map(|segment| urlencoding::decode_binary(segment.as_bytes()).into_owned())
        .collect();
    path_from_bytes(decoded.join(&b'/'))
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> Option<PathBuf> {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;
    Some(PathBuf::from(OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> Option<PathBuf> {
    String::from_utf8(bytes).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests;
