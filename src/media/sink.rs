//! Utilities for creating `rodio` sinks from resolved file paths.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested volume.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::MediaError;

pub(super) struct Prepared {
    pub sink: Sink,
    pub duration: Option<Duration>,
}

/// Create a paused `Sink` for the file at `path`.
pub(super) fn create_sink(
    handle: &OutputStream,
    path: &Path,
    volume: f32,
) -> Result<Prepared, MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    // Many mp3s carry no length in the stream; the container header usually does.
    let duration = source.total_duration().or_else(|| tagged_duration(path));

    let sink = Sink::connect_new(handle.mixer());
    sink.pause();
    sink.set_volume(volume);
    sink.append(source);
    Ok(Prepared { sink, duration })
}

fn tagged_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let duration = tagged.properties().duration();
    (!duration.is_zero()).then_some(duration)
}
