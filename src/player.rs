//! Playback core: current track, play/pause, progress and volume.
//!
//! `PlaybackController` mediates between the playlist and a `MediaHandle`;
//! `VolumeBus` carries volume changes to their subscribers; `state` holds
//! the plain values and the small amount of arithmetic behind them.

mod controller;
mod state;
mod volume;

pub use controller::PlaybackController;
pub use state::*;
pub use volume::{SubscriptionId, VolumeBus};
