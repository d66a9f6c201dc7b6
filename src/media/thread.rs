use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::config::AudioSettings;
use crate::object_url::ObjectUrls;

use super::sink::{Prepared, create_sink};
use super::types::{LoadId, MediaCmd, MediaError, MediaEvent};

pub(super) fn spawn_audio_thread(
    rx: Receiver<MediaCmd>,
    events: Sender<MediaEvent>,
    urls: ObjectUrls,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Ok(stream)
            }
            Err(e) => {
                error!("no audio output device: {e}");
                Err(e.to_string())
            }
        };

        let mut deck = Deck {
            stream,
            urls,
            events,
            volume: 1.0,
            load: LoadId::default(),
            current: None,
        };

        let tick = Duration::from_millis(audio_settings.time_update_ms.max(1));
        let mut last_tick = Instant::now();

        loop {
            let wait = tick.saturating_sub(last_tick.elapsed());
            match rx.recv_timeout(wait) {
                Ok(cmd) => {
                    if !deck.apply(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= tick {
                deck.tick();
                last_tick = Instant::now();
            }
        }
    })
}

/// The single resource slot the audio thread drives.
struct Deck {
    stream: Result<OutputStream, String>,
    urls: ObjectUrls,
    events: Sender<MediaEvent>,
    volume: f32,
    load: LoadId,
    current: Option<Current>,
}

struct Current {
    path: PathBuf,
    sink: Sink,
    duration: Option<Duration>,
    playing: bool,
}

impl Deck {
    /// Returns `false` once the thread should stop.
    fn apply(&mut self, cmd: MediaCmd) -> bool {
        debug!(?cmd, "media command");
        match cmd {
            MediaCmd::Load { url, load } => self.load(&url, load),
            MediaCmd::Play => self.play(),
            MediaCmd::Pause => {
                if let Some(c) = self.current.as_mut() {
                    c.sink.pause();
                    c.playing = false;
                }
            }
            MediaCmd::Seek(seconds) => self.seek(seconds),
            MediaCmd::SetVolume(volume) => {
                self.volume = volume.clamp(0.0, 1.0);
                if let Some(c) = self.current.as_ref() {
                    c.sink.set_volume(self.volume);
                }
            }
            MediaCmd::Quit { fade_out_ms } => {
                self.quit(fade_out_ms);
                return false;
            }
        }
        true
    }

    fn prepare(&self, path: &Path) -> Result<Prepared, MediaError> {
        let stream = self
            .stream
            .as_ref()
            .map_err(|e| MediaError::NoOutputDevice(e.clone()))?;
        create_sink(stream, path, self.volume)
    }

    fn load(&mut self, url: &str, load: LoadId) {
        self.load = load;
        if let Some(old) = self.current.take() {
            old.sink.stop();
        }

        let prepared = self
            .urls
            .resolve(url)
            .ok_or_else(|| MediaError::UnresolvedLocator(url.to_string()))
            .and_then(|path| self.prepare(&path).map(|p| (path, p)));

        match prepared {
            Ok((path, Prepared { sink, duration })) => {
                let _ = self.events.send(MediaEvent::LoadedData {
                    load,
                    duration: duration.map(|d| d.as_secs_f64()),
                });
                self.current = Some(Current {
                    path,
                    sink,
                    duration,
                    playing: false,
                });
            }
            Err(error) => {
                let _ = self.events.send(MediaEvent::Rejected { load, error });
            }
        }
    }

    fn play(&mut self) {
        let load = self.load;
        let Some(mut current) = self.current.take() else {
            let error = match &self.stream {
                Err(e) => MediaError::NoOutputDevice(e.clone()),
                Ok(_) => MediaError::NothingLoaded,
            };
            let _ = self.events.send(MediaEvent::Rejected { load, error });
            return;
        };

        // A drained sink cannot rewind; start the file over like an ended <audio>.
        if current.sink.empty() {
            match self.prepare(&current.path) {
                Ok(Prepared { sink, duration }) => {
                    current.sink = sink;
                    current.duration = duration.or(current.duration);
                }
                Err(error) => {
                    let _ = self.events.send(MediaEvent::Rejected { load, error });
                    self.current = Some(current);
                    return;
                }
            }
        }

        current.sink.play();
        current.playing = true;
        self.current = Some(current);
        let _ = self.events.send(MediaEvent::Playing { load });
    }

    fn seek(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let Some(c) = self.current.as_ref() else {
            return;
        };

        let mut target = Duration::from_secs_f64(seconds.max(0.0));
        if let Some(total) = c.duration {
            target = target.min(total);
        }
        if let Err(e) = c.sink.try_seek(target) {
            warn!("seek to {:.1}s failed: {e}", target.as_secs_f64());
        }
        let _ = self.events.send(MediaEvent::TimeUpdate {
            load: self.load,
            current: c.sink.get_pos().as_secs_f64(),
            duration: c.duration.map_or(f64::NAN, |d| d.as_secs_f64()),
        });
    }

    /// Periodic position report; also where natural completion is noticed.
    fn tick(&mut self) {
        let load = self.load;
        let Some(c) = self.current.as_mut() else {
            return;
        };
        if !c.playing {
            return;
        }

        if c.sink.empty() {
            c.playing = false;
            let _ = self.events.send(MediaEvent::Ended { load });
            return;
        }

        let _ = self.events.send(MediaEvent::TimeUpdate {
            load,
            current: c.sink.get_pos().as_secs_f64(),
            duration: c.duration.map_or(f64::NAN, |d| d.as_secs_f64()),
        });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(c) = self.current.take() {
            if c.playing {
                fade_out_sink(&c.sink, self.volume, fade_out_ms);
            }
            c.sink.stop();
        }
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
