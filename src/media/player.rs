use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::object_url::ObjectUrls;

use super::thread::spawn_audio_thread;
use super::types::{LoadId, MediaCmd, MediaEvent, MediaHandle};

/// `MediaHandle` backed by the rodio audio thread.
///
/// Clones talk to the same thread.
#[derive(Clone)]
pub struct RodioMedia {
    tx: Sender<MediaCmd>,
    join: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl RodioMedia {
    /// Start the audio thread. Events come back on the returned receiver.
    pub fn spawn(urls: ObjectUrls, audio_settings: AudioSettings) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();

        let audio_handle = spawn_audio_thread(rx, event_tx, urls, audio_settings);

        let media = Self {
            tx,
            join: Arc::new(Mutex::new(Some(audio_handle))),
        };
        (media, event_rx)
    }

    pub fn send(&self, cmd: MediaCmd) -> Result<(), mpsc::SendError<MediaCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(MediaCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaHandle for RodioMedia {
    fn load(&mut self, url: &str, load: LoadId) {
        let _ = self.send(MediaCmd::Load {
            url: url.to_string(),
            load,
        });
    }

    fn play(&mut self) {
        let _ = self.send(MediaCmd::Play);
    }

    fn pause(&mut self) {
        let _ = self.send(MediaCmd::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        let _ = self.send(MediaCmd::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(MediaCmd::SetVolume(volume));
    }
}
