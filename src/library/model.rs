use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A playable entry in the playlist: a resource locator plus a display label.
///
/// This is also the persisted shape (`{"url": ..., "name": ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub url: String,
    pub name: String,
}

/// One uploaded audio file, before it has been given a locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// File name including extension, used as the track label.
    pub name: String,
    pub path: PathBuf,
}

impl FileBlob {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}
