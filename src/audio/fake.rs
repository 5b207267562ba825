//! In-memory media backend for tests.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use crate::library::Track;

use super::backend::{MediaBackend, MediaHandle};
use super::types::{MediaError, MediaEventKind, Preload};

#[derive(Debug, Default)]
pub(crate) struct FakeLog {
    pub created: Vec<usize>,
    pub plays: Vec<usize>,
    pub pauses: Vec<usize>,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    log: Rc<RefCell<FakeLog>>,
    failing: Rc<RefCell<HashSet<usize>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<FakeLog>> {
        self.log.clone()
    }

    /// Shared switchboard: indices whose `play` is rejected.
    pub fn failing(&self) -> Rc<RefCell<HashSet<usize>>> {
        self.failing.clone()
    }
}

impl MediaBackend for FakeBackend {
    type Handle = FakeHandle;

    fn create(&mut self, index: usize, _track: &Track, known_duration: Option<f64>) -> FakeHandle {
        self.log.borrow_mut().created.push(index);
        let mut events = VecDeque::new();
        if let Some(duration) = known_duration {
            events.push_back(MediaEventKind::LoadedMetadata { duration });
        }
        FakeHandle {
            index,
            duration: known_duration,
            position: 0.0,
            playing: false,
            preload: Preload::Metadata,
            events,
            log: self.log.clone(),
            failing: self.failing.clone(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct FakeHandle {
    pub index: usize,
    pub duration: Option<f64>,
    pub position: f64,
    pub playing: bool,
    pub preload: Preload,
    pub events: VecDeque<MediaEventKind>,
    log: Rc<RefCell<FakeLog>>,
    failing: Rc<RefCell<HashSet<usize>>>,
}

impl MediaHandle for FakeHandle {
    fn play(&mut self) -> Result<(), MediaError> {
        if self.failing.borrow().contains(&self.index) {
            return Err(MediaError::Open {
                path: PathBuf::from(format!("track-{}", self.index)),
                source: io::Error::new(io::ErrorKind::NotFound, "missing source"),
            });
        }
        self.log.borrow_mut().plays.push(self.index);
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.log.borrow_mut().pauses.push(self.index);
        self.playing = false;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, secs: f64) {
        self.position = secs;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn preload(&self) -> Preload {
        self.preload
    }

    fn set_preload(&mut self, preload: Preload) {
        self.preload = preload;
    }

    fn poll_event(&mut self) -> Option<MediaEventKind> {
        self.events.pop_front()
    }
}
