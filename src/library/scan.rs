use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::FileBlob;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand uploaded paths into audio file blobs.
///
/// Paths are processed in the given order. A file is taken as-is when it has
/// an accepted extension; a directory contributes its audio files sorted by
/// name. Anything else (missing paths, non-audio files) is skipped.
pub fn collect_uploads(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<FileBlob> {
    let mut blobs: Vec<FileBlob> = Vec::new();

    for path in paths {
        if path.is_dir() {
            blobs.extend(walk_dir(path, settings));
        } else if path.is_file() && is_audio_file(path, settings) {
            blobs.push(FileBlob::from_path(path.clone()));
        } else {
            debug!(path = %path.display(), "skipping upload: not an audio file");
        }
    }

    blobs
}

fn walk_dir(dir: &Path, settings: &LibrarySettings) -> Vec<FileBlob> {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() || entry.path().is_file())
        .filter(|entry| is_audio_file(entry.path(), settings))
        .map(|entry| FileBlob::from_path(entry.into_path()))
        .collect()
}
