//! Media playback: the `MediaHandle` seam and its rodio-backed host.
//!
//! `RodioMedia` forwards commands to a dedicated audio thread which owns the
//! output stream and the current sink, and reports back through
//! `MediaEvent`s on a channel.

mod player;
mod sink;
mod thread;
mod types;

pub use player::RodioMedia;
pub use types::*;

#[cfg(test)]
pub(crate) mod testing;
