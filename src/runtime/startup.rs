use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::app::PlayerView;
use crate::config;
use crate::library::collect_uploads;
use crate::media::RodioMedia;
use crate::object_url::ObjectUrls;
use crate::player::{PlaybackController, volume_from_percent};
use crate::playlist::{LoadOutcome, PlaylistState};
use crate::store::{FileStore, MemoryStore, PersistentStore};

fn open_store(settings: &config::Settings) -> Box<dyn PersistentStore> {
    match settings.storage_path() {
        Some(path) => {
            info!(path = %path.display(), "using playlist store");
            Box::new(FileStore::open(path))
        }
        None => {
            warn!("no data directory; the playlist will not survive a restart");
            Box::new(MemoryStore::new())
        }
    }
}

/// Wire the playlist, controller and URL registry together and bring back
/// the saved playlist.
pub fn build_view(
    settings: &config::Settings,
    media: RodioMedia,
    urls: ObjectUrls,
) -> PlayerView<RodioMedia> {
    let playlist = PlaylistState::new(open_store(settings), settings.storage.key.clone());
    let mut controller = PlaybackController::new(
        media,
        volume_from_percent(settings.audio.initial_volume_percent),
        settings.playback.autoplay_next,
    );
    controller.subscribe_volume(|volume| debug!(volume, "volume changed"));
    let mut view = PlayerView::new(playlist, controller, Box::new(urls));

    if let LoadOutcome::Restored(n) = view.restore() {
        view.status = Some(format!("restored {n} track(s)"));
    }
    view
}

/// Expand `paths` (files or folders) and add what they contain.
pub fn upload_paths(
    view: &mut PlayerView<RodioMedia>,
    paths: &[PathBuf],
    library: &config::LibrarySettings,
) -> usize {
    if paths.is_empty() {
        return 0;
    }
    let blobs = collect_uploads(paths, library);
    if blobs.is_empty() {
        let shown: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        view.status = Some(format!("no audio files in {}", shown.join(", ")));
        return 0;
    }
    view.upload(blobs)
}

/// Expand a leading `~` to `home` the way a shell would for prompt input.
pub fn expand_home(input: &str, home: Option<&Path>) -> PathBuf {
    match (input.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') => {
            home.join(Path::new(rest.trim_start_matches('/')))
        }
        _ => PathBuf::from(input),
    }
}
