//! Playback state values and the arithmetic behind them.

/// Play-confirmation phase of the current track.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    /// No playlist.
    #[default]
    Idle,
    /// A track is selected and paused.
    Loaded,
    /// Play was requested; the media handle has not confirmed yet.
    Pending,
    Playing,
    Paused,
}

/// Snapshot of what the UI shows.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    /// `None` exactly when the playlist is empty.
    pub current_track_index: Option<usize>,
    pub is_playing: bool,
    /// 0..=100
    pub progress_percent: f64,
    pub duration_seconds: f64,
    /// 0.0..=1.0
    pub volume: f32,
}

/// `current / total * 100`, or 0 when `total` cannot be divided by.
pub fn progress_percent(current: f64, total: f64) -> f64 {
    if !total.is_finite() || total <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    (current / total * 100.0).clamp(0.0, 100.0)
}

/// Absolute seek target for a slider position.
pub fn seek_target(percent: f64, duration: f64) -> f64 {
    percent.clamp(0.0, 100.0) / 100.0 * duration
}

pub fn volume_from_percent(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

pub fn volume_to_percent(volume: f32) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Format seconds as `m:ss` (minutes unpadded).
pub fn format_duration(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}
