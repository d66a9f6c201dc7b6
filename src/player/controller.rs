use tracing::{debug, warn};

use crate::library::Track;
use crate::media::{LoadId, MediaError, MediaEvent, MediaHandle};

use super::state::{
    Phase, PlaybackState, progress_percent, seek_target, volume_from_percent,
};
use super::volume::{SubscriptionId, VolumeBus};

/// Owns the playback state and is the only thing that drives the media handle.
///
/// Every transport operation takes the current track list and is a silent
/// no-op when it is empty. Media events are matched against the most recent
/// load; anything tagged with an older `LoadId` is dropped.
pub struct PlaybackController<M: MediaHandle> {
    media: M,
    index: Option<usize>,
    is_playing: bool,
    progress: f64,
    duration: f64,
    phase: Phase,
    volume: VolumeBus,
    last_load: LoadId,
    active_load: Option<LoadId>,
    play_on_load: bool,
    autoplay_next: bool,
}

impl<M: MediaHandle + Clone + 'static> PlaybackController<M> {
    /// Create a controller and subscribe `media` to volume changes.
    pub fn new(media: M, initial_volume: f32, autoplay_next: bool) -> Self {
        let mut volume = VolumeBus::new(initial_volume);
        let mut volume_sink = media.clone();
        volume.subscribe(move |v| volume_sink.set_volume(v));

        let mut controller = Self {
            media,
            index: None,
            is_playing: false,
            progress: 0.0,
            duration: 0.0,
            phase: Phase::Idle,
            volume,
            last_load: LoadId::default(),
            active_load: None,
            play_on_load: false,
            autoplay_next,
        };
        // The subscription only fires on change; the handle still needs the start value.
        let start = controller.volume.get();
        controller.media.set_volume(start);
        controller
    }
}

impl<M: MediaHandle> PlaybackController<M> {
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_track_index: self.index,
            is_playing: self.is_playing,
            progress_percent: self.progress,
            duration_seconds: self.duration,
            volume: self.volume.get(),
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_track_index(&self) -> Option<usize> {
        self.index
    }

    pub fn current_track<'a>(&self, tracks: &'a [Track]) -> Option<&'a Track> {
        self.index.and_then(|i| tracks.get(i))
    }

    /// Whether events tagged with `load` would still be acted on.
    pub fn is_current_load(&self, load: LoadId) -> bool {
        self.active_load == Some(load)
    }

    pub fn volume(&self) -> f32 {
        self.volume.get()
    }

    /// Observe committed volume changes in addition to the media handle.
    pub fn subscribe_volume(&mut self, subscriber: impl FnMut(f32) + 'static) -> SubscriptionId {
        self.volume.subscribe(subscriber)
    }

    #[cfg(test)]
    pub fn unsubscribe_volume(&mut self, id: SubscriptionId) -> bool {
        self.volume.unsubscribe(id)
    }

    /// Point at the first track, paused. Used after the playlist goes from
    /// empty to non-empty.
    pub fn reset_to_first(&mut self, tracks: &[Track]) {
        if tracks.is_empty() {
            self.index = None;
            self.phase = Phase::Idle;
            return;
        }
        self.index = Some(0);
        self.is_playing = false;
        self.progress = 0.0;
        self.duration = 0.0;
        self.play_on_load = false;
        self.phase = Phase::Loaded;
        self.issue_load(tracks, 0);
    }

    pub fn toggle_play_pause(&mut self, tracks: &[Track]) {
        if tracks.is_empty() {
            return;
        }
        if self.index.is_none() {
            self.reset_to_first(tracks);
        }

        if self.is_playing {
            self.media.pause();
            self.play_on_load = false;
            self.phase = Phase::Paused;
        } else {
            self.media.play();
            self.phase = Phase::Pending;
        }
        self.is_playing = !self.is_playing;
    }

    /// Recompute progress from a position report. An unknown or zero
    /// `total` yields progress 0 and duration 0.
    pub fn on_time_update(&mut self, current: f64, total: f64) {
        self.progress = progress_percent(current, total);
        self.duration = if total.is_finite() && total > 0.0 {
            total
        } else {
            0.0
        };
    }

    /// Jump to `percent` of the known duration. Progress is set right away,
    /// before the handle reports the new position. Returns the target time,
    /// or `None` when nothing is loaded or the duration is unknown.
    pub fn seek(&mut self, percent: f64, tracks: &[Track]) -> Option<f64> {
        if tracks.is_empty() || self.index.is_none() || percent.is_nan() {
            return None;
        }
        if self.duration <= 0.0 {
            return None;
        }
        let percent = percent.clamp(0.0, 100.0);
        let target = seek_target(percent, self.duration);
        self.media.seek(target);
        self.progress = percent;
        Some(target)
    }

    pub fn next_track(&mut self, tracks: &[Track]) {
        self.step(tracks, true);
    }

    pub fn previous_track(&mut self, tracks: &[Track]) {
        self.step(tracks, false);
    }

    /// Switch to `index` and start it once the handle has loaded it.
    pub fn select_track(&mut self, index: usize, tracks: &[Track]) {
        if index >= tracks.len() {
            return;
        }
        self.index = Some(index);
        self.is_playing = true;
        self.progress = 0.0;
        self.duration = 0.0;
        self.play_on_load = true;
        self.phase = Phase::Pending;
        self.issue_load(tracks, index);
    }

    /// Slider value 0..=100 to linear volume.
    pub fn set_volume(&mut self, percent: u8) {
        self.volume.commit(volume_from_percent(percent));
    }

    pub fn handle_media_event(&mut self, event: MediaEvent, tracks: &[Track]) {
        if !self.is_current_load(event.load()) {
            debug!(load = ?event.load(), active = ?self.active_load, "ignoring stale media event");
            return;
        }

        match event {
            MediaEvent::LoadedData { duration, .. } => self.on_loaded_data(duration),
            MediaEvent::TimeUpdate {
                current, duration, ..
            } => self.on_time_update(current, duration),
            MediaEvent::Playing { .. } => {
                if self.phase == Phase::Pending {
                    self.phase = Phase::Playing;
                }
            }
            MediaEvent::Ended { .. } => self.on_ended(tracks),
            MediaEvent::Rejected { error, .. } => self.on_rejected(&error),
        }
    }

    fn on_loaded_data(&mut self, duration: Option<f64>) {
        if let Some(d) = duration.filter(|d| d.is_finite() && *d > 0.0) {
            self.duration = d;
        }
        if self.play_on_load {
            self.play_on_load = false;
            self.media.play();
        }
    }

    fn on_ended(&mut self, tracks: &[Track]) {
        if tracks.is_empty() {
            return;
        }
        self.step(tracks, true);
        if self.autoplay_next {
            self.is_playing = true;
            self.play_on_load = true;
            self.phase = Phase::Pending;
        }
    }

    /// The handle refused to load or start. The playing flag follows the
    /// handle rather than the request.
    fn on_rejected(&mut self, error: &MediaError) {
        warn!(index = ?self.index, "playback rejected: {error}");
        self.is_playing = false;
        self.play_on_load = false;
        self.phase = Phase::Loaded;
    }

    fn step(&mut self, tracks: &[Track], forward: bool) {
        let len = tracks.len();
        if len == 0 {
            return;
        }
        let current = self.index.unwrap_or(0).min(len - 1);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };

        self.index = Some(next);
        self.is_playing = false;
        self.progress = 0.0;
        self.duration = 0.0;
        self.play_on_load = false;
        self.phase = Phase::Loaded;
        self.issue_load(tracks, next);
    }

    fn issue_load(&mut self, tracks: &[Track], index: usize) {
        let Some(track) = tracks.get(index) else {
            return;
        };
        let load = self.last_load.next();
        self.last_load = load;
        self.active_load = Some(load);

        debug!(index, url = %track.url, ?load, "loading track");
        self.media.pause();
        self.media.load(&track.url, load);
    }
}
