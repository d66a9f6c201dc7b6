//! Application module: exposes the player view driven by the TUI and runtime.
//!
//! `PlayerView` lives in `app::model` and ties the playlist, the playback
//! controller and the URL provider together.

mod model;

pub use model::*;
