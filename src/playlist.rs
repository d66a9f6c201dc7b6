//! The ordered list of uploaded tracks and its persistence.
//!
//! Insertion order is playback order. Every change is written to the
//! persistent store as a JSON array of `{url, name}` under a fixed key;
//! writes are fire-and-forget.

use tracing::{info, warn};

use crate::library::Track;
use crate::object_url::ObjectUrlProvider;
use crate::store::PersistentStore;

/// Store key used when `storage.key` is not configured.
pub const DEFAULT_PLAYLIST_KEY: &str = "audioFiles";

/// What `PlaylistState::load` found in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Absent,
    Malformed,
    Restored(usize),
}

pub struct PlaylistState {
    tracks: Vec<Track>,
    store: Box<dyn PersistentStore>,
    key: String,
}

impl PlaylistState {
    pub fn new(store: Box<dyn PersistentStore>, key: impl Into<String>) -> Self {
        Self {
            tracks: Vec::new(),
            store,
            key: key.into(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Add `tracks` to the end and persist. Returns whether the playlist
    /// was empty before the call.
    pub fn append(&mut self, tracks: Vec<Track>) -> bool {
        let was_empty = self.tracks.is_empty();
        if tracks.is_empty() {
            return was_empty;
        }
        self.tracks.extend(tracks);
        self.persist();
        was_empty
    }

    /// Populate from the store. Absent or malformed data leaves the
    /// playlist as it is.
    pub fn load(&mut self, urls: &dyn ObjectUrlProvider) -> LoadOutcome {
        let Some(raw) = self.store.get_item(&self.key) else {
            return LoadOutcome::Absent;
        };

        let tracks: Vec<Track> = match serde_json::from_str(&raw) {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(key = %self.key, "ignoring malformed persisted playlist: {e}");
                return LoadOutcome::Malformed;
            }
        };

        let missing = tracks
            .iter()
            .filter(|t| !urls.adopt_object_url(&t.url))
            .count();
        if missing > 0 {
            warn!(missing, "some restored tracks no longer point at readable files");
        }

        let restored = tracks.len();
        self.tracks = tracks;
        info!(restored, "restored playlist");
        LoadOutcome::Restored(restored)
    }

    /// Revoke every locator the playlist holds. The tracks stay listed.
    pub fn release(&self, urls: &dyn ObjectUrlProvider) {
        for track in &self.tracks {
            urls.revoke_object_url(&track.url);
        }
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.tracks) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("cannot encode playlist: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set_item(&self.key, &payload) {
            warn!(key = %self.key, "cannot persist playlist: {e}");
        }
    }
}

#[cfg(test)]
mod tests;
