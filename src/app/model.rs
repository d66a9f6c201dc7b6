//! Application model types: `PlayerView` and `Intent`.
//!
//! `PlayerView` owns the playlist, the playback controller and the URL
//! provider. The runtime feeds it UI intents and media events; the UI reads
//! from it.

use tracing::{info, warn};

use crate::library::{FileBlob, Track};
use crate::media::{MediaEvent, MediaHandle};
use crate::object_url::ObjectUrlProvider;
use crate::player::{Phase, PlaybackController, PlaybackState, volume_to_percent};
use crate::playlist::{LoadOutcome, PlaylistState};

/// A control the user operated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    TogglePlayPause,
    Next,
    Previous,
    /// Absolute slider position, 0..=100.
    Seek(u8),
    /// Relative move of the seek slider in percent points.
    SeekBy(i16),
    Volume(u8),
    VolumeBy(i16),
    Select(usize),
}

pub struct PlayerView<M: MediaHandle> {
    playlist: PlaylistState,
    controller: PlaybackController<M>,
    urls: Box<dyn ObjectUrlProvider>,

    /// Highlighted row; independent of the playing track.
    pub selected: usize,
    /// Last notice shown on the status line.
    pub status: Option<String>,
    /// Text typed into the "add path" prompt, `None` while it is closed.
    pub prompt: Option<String>,
}

impl<M: MediaHandle> PlayerView<M> {
    pub fn new(
        playlist: PlaylistState,
        controller: PlaybackController<M>,
        urls: Box<dyn ObjectUrlProvider>,
    ) -> Self {
        Self {
            playlist,
            controller,
            urls,
            selected: 0,
            status: None,
            prompt: None,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        self.playlist.tracks()
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.controller.current_track(self.playlist.tracks())
    }

    pub fn media(&self) -> &M {
        self.controller.media()
    }

    pub fn volume_percent(&self) -> u8 {
        volume_to_percent(self.controller.volume())
    }

    /// Load the persisted playlist and point at its first track.
    pub fn restore(&mut self) -> LoadOutcome {
        let outcome = self.playlist.load(self.urls.as_ref());
        if !self.playlist.is_empty() {
            self.controller.reset_to_first(self.playlist.tracks());
            self.selected = 0;
        }
        if outcome == LoadOutcome::Malformed {
            self.status = Some("saved playlist was unreadable; starting empty".to_string());
        }
        outcome
    }

    /// Turn uploaded files into tracks and append them. Files that cannot
    /// be given a locator are skipped. Returns how many tracks were added.
    pub fn upload(&mut self, blobs: Vec<FileBlob>) -> usize {
        let mut added: Vec<Track> = Vec::with_capacity(blobs.len());
        for blob in blobs {
            match self.urls.create_object_url(&blob) {
                Ok(url) => added.push(Track {
                    url,
                    name: blob.name,
                }),
                Err(e) => warn!("skipping upload: {e}"),
            }
        }

        let count = added.len();
        if count == 0 {
            return 0;
        }

        let was_empty = self.playlist.append(added);
        if was_empty {
            self.controller.reset_to_first(self.playlist.tracks());
            self.selected = 0;
        }
        info!(count, total = self.playlist.len(), "uploaded tracks");
        self.status = Some(format!("added {count} track(s)"));
        count
    }

    pub fn apply(&mut self, intent: Intent) {
        let tracks = self.playlist.tracks();
        match intent {
            Intent::TogglePlayPause => self.controller.toggle_play_pause(tracks),
            Intent::Next => self.controller.next_track(tracks),
            Intent::Previous => self.controller.previous_track(tracks),
            Intent::Seek(percent) => {
                self.controller.seek(f64::from(percent), tracks);
            }
            Intent::SeekBy(delta) => {
                let target = self.controller.state().progress_percent + f64::from(delta);
                self.controller.seek(target.clamp(0.0, 100.0), tracks);
            }
            Intent::Volume(percent) => self.controller.set_volume(percent),
            Intent::VolumeBy(delta) => {
                let target = i16::from(self.volume_percent()) + delta;
                self.controller.set_volume(target.clamp(0, 100) as u8);
            }
            Intent::Select(index) => self.controller.select_track(index, tracks),
        }

        if matches!(intent, Intent::Next | Intent::Previous | Intent::Select(_)) {
            if let Some(index) = self.controller.current_track_index() {
                self.selected = index;
            }
        }
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match &event {
            MediaEvent::Rejected { load, error } if self.controller.is_current_load(*load) => {
                let name = self
                    .current_track()
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                self.status = Some(format!("cannot play {name}: {error}"));
            }
            MediaEvent::Playing { load } if self.controller.is_current_load(*load) => {
                self.status = None;
            }
            _ => {}
        }
        self.controller
            .handle_media_event(event, self.playlist.tracks());
    }

    /// Move the highlight down one row, wrapping to the top.
    pub fn cursor_down(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the highlight up one row, wrapping to the bottom.
    pub fn cursor_up(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.pop();
        }
    }

    /// Close the prompt and return what was typed, trimmed.
    pub fn take_prompt(&mut self) -> Option<String> {
        self.prompt
            .take()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
    }

    /// Release every locator. The view should not be used to play afterwards.
    pub fn shutdown(&mut self) {
        self.playlist.release(self.urls.as_ref());
    }
}
