use crate::library::Track;

use super::types::{MediaError, MediaEventKind, Preload};

/// A playable media object bound to one track's source.
///
/// Positions and durations are seconds. Handles never call back into the
/// controller; they queue events that the owner drains with `poll_event`.
pub trait MediaHandle {
    /// Request playback. Failures leave the handle paused.
    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn position(&self) -> f64;

    /// Move the playback position without changing play/pause state.
    fn set_position(&mut self, secs: f64);

    /// Total length, once known.
    fn duration(&self) -> Option<f64>;

    fn preload(&self) -> Preload;

    /// Promote (or demote) how eagerly the source is loaded. Never starts playback.
    fn set_preload(&mut self, preload: Preload);

    /// Next queued event, if any.
    fn poll_event(&mut self) -> Option<MediaEventKind>;
}

/// Creates handles. Creation is cheap and infallible; failures surface on
/// `play` or as queued `MediaEventKind::Error`s.
pub trait MediaBackend {
    type Handle: MediaHandle;

    /// `known_duration` is whatever the labels already hold; a handle
    /// reports it as loaded metadata instead of reading the file.
    fn create(&mut self, index: usize, track: &Track, known_duration: Option<f64>)
    -> Self::Handle;
}
