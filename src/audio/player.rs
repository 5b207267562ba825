use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::library::Track;

use super::backend::{MediaBackend, MediaHandle};
use super::sink::create_sink_at;
use super::types::{MediaError, MediaEventKind, Preload};

/// Creates rodio-backed handles sharing one output stream.
pub struct RodioBackend {
    stream: Rc<OutputStream>,
    time_update: Duration,
}

impl RodioBackend {
    /// Open the default output device. `time_update` throttles position events.
    pub fn open(time_update: Duration) -> Result<Self, MediaError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped; that corrupts the TUI.
        stream.log_on_drop(false);
        Ok(Self {
            stream: Rc::new(stream),
            time_update,
        })
    }
}

impl MediaBackend for RodioBackend {
    type Handle = RodioHandle;

    fn create(&mut self, index: usize, track: &Track, known_duration: Option<f64>) -> RodioHandle {
        tracing::debug!(index, path = %track.src.display(), "creating media handle");
        RodioHandle::new(
            self.stream.clone(),
            track.src.clone(),
            known_duration,
            self.time_update,
        )
    }
}

pub struct RodioHandle {
    stream: Rc<OutputStream>,
    path: PathBuf,
    sink: Option<Sink>,
    duration: Option<f64>,
    preload: Preload,
    playing: bool,
    /// Position to apply when the sink is (re)built.
    start_at: Duration,
    /// File position the current sink started from; `get_pos` counts from here.
    offset: Duration,
    time_update: Duration,
    last_update: Option<Instant>,
    events: VecDeque<MediaEventKind>,
}

impl RodioHandle {
    fn new(
        stream: Rc<OutputStream>,
        path: PathBuf,
        known_duration: Option<f64>,
        time_update: Duration,
    ) -> Self {
        let mut handle = Self {
            stream,
            path,
            sink: None,
            duration: known_duration,
            preload: Preload::Metadata,
            playing: false,
            start_at: Duration::ZERO,
            offset: Duration::ZERO,
            time_update,
            last_update: None,
            events: VecDeque::new(),
        };
        handle.load_metadata();
        handle
    }

    /// `Preload::Metadata` level: report a duration the caller already knows.
    /// Unknown durations arrive from the decoder once the sink is built, so
    /// creating a handle never touches the file.
    fn load_metadata(&mut self) {
        if let Some(duration) = self.duration {
            self.events
                .push_back(MediaEventKind::LoadedMetadata { duration });
        }
    }

    /// Build the sink if there is none, or if the previous one played out.
    fn ensure_sink(&mut self) -> Result<(), MediaError> {
        let usable = self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false);
        if usable {
            return Ok(());
        }

        let (sink, total) = create_sink_at(self.stream.mixer(), &self.path, self.start_at)?;
        if self.duration.is_none() {
            if let Some(total) = total {
                let secs = total.as_secs_f64();
                self.duration = Some(secs);
                self.events
                    .push_back(MediaEventKind::LoadedMetadata { duration: secs });
            }
        }
        self.sink = Some(sink);
        self.offset = self.start_at;
        self.start_at = Duration::ZERO;
        Ok(())
    }
}

impl MediaHandle for RodioHandle {
    fn play(&mut self) -> Result<(), MediaError> {
        self.ensure_sink()?;
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
        self.playing = true;
        self.last_update = None;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        self.playing = false;
    }

    fn position(&self) -> f64 {
        match self.sink.as_ref() {
            Some(sink) => (self.offset + sink.get_pos()).as_secs_f64(),
            None => self.start_at.as_secs_f64(),
        }
    }

    fn set_position(&mut self, secs: f64) {
        let target = Duration::from_secs_f64(if secs.is_finite() { secs.max(0.0) } else { 0.0 });

        // Stop the old sink and rebuild at the target, in either direction.
        let resume = match self.sink.take() {
            Some(sink) if !sink.empty() => {
                let resume = !sink.is_paused();
                sink.stop();
                Some(resume)
            }
            // Played out or never built; rebuild lazily at the new position.
            _ => None,
        };
        self.start_at = target;

        let Some(resume) = resume else {
            return;
        };
        match self.ensure_sink() {
            Ok(()) => {
                if let (true, Some(sink)) = (resume, self.sink.as_ref()) {
                    sink.play();
                }
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "seek failed: {e}");
                self.playing = false;
                self.events.push_back(MediaEventKind::Error(e.to_string()));
            }
        }
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn preload(&self) -> Preload {
        self.preload
    }

    fn set_preload(&mut self, preload: Preload) {
        if self.preload == preload {
            return;
        }
        self.preload = preload;
        if preload == Preload::Auto {
            if let Err(e) = self.ensure_sink() {
                self.events.push_back(MediaEventKind::Error(e.to_string()));
            }
        }
    }

    fn poll_event(&mut self) -> Option<MediaEventKind> {
        if self.playing {
            if let Some(sink) = self.sink.as_ref() {
                if sink.empty() {
                    self.playing = false;
                    self.events.push_back(MediaEventKind::Ended);
                } else {
                    let due = self
                        .last_update
                        .map(|t| t.elapsed() >= self.time_update)
                        .unwrap_or(true);
                    if due {
                        self.last_update = Some(Instant::now());
                        self.events.push_back(MediaEventKind::TimeUpdate);
                    }
                }
            }
        }
        self.events.pop_front()
    }
}
