//! Media command/event types and the `MediaHandle` seam.
//!
//! The controller talks to the media side only through `MediaHandle`
//! (fire-and-forget commands) and hears back through `MediaEvent`s, each
//! tagged with the `LoadId` of the resource it concerns.

use std::path::PathBuf;

use thiserror::Error;

/// Token issued for every `load`; events for any other token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LoadId(pub u64);

impl LoadId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Commands understood by one playable resource slot.
pub trait MediaHandle {
    /// Replace the current resource. Playback stays paused.
    fn load(&mut self, url: &str, load: LoadId);
    fn play(&mut self);
    fn pause(&mut self);
    /// Jump to an absolute position in seconds.
    fn seek(&mut self, seconds: f64);
    /// Linear volume, 0.0..=1.0.
    fn set_volume(&mut self, volume: f32);
}

#[derive(Debug)]
pub enum MediaCmd {
    Load { url: String, load: LoadId },
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug)]
pub enum MediaEvent {
    /// The resource is decoded and ready; `duration` when known.
    LoadedData { load: LoadId, duration: Option<f64> },
    /// Periodic position report. `duration` is NaN when unknown.
    TimeUpdate {
        load: LoadId,
        current: f64,
        duration: f64,
    },
    /// A play request took effect.
    Playing { load: LoadId },
    /// The resource played to its end.
    Ended { load: LoadId },
    /// Loading or starting playback failed.
    Rejected { load: LoadId, error: MediaError },
}

impl MediaEvent {
    pub fn load(&self) -> LoadId {
        match self {
            MediaEvent::LoadedData { load, .. }
            | MediaEvent::TimeUpdate { load, .. }
            | MediaEvent::Playing { load }
            | MediaEvent::Ended { load }
            | MediaEvent::Rejected { load, .. } => *load,
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("locator {0} is not live")]
    UnresolvedLocator(String),
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("nothing is loaded")]
    NothingLoaded,
}
