//! Media layer: lazily created playable handles, one per track.
//!
//! The controller only sees the `MediaBackend` / `MediaHandle` traits. The
//! rodio implementation opens and decodes a file on first real need
//! (`Preload::Auto` or `play`). Before that it only reports a duration the
//! labels already know.

mod backend;
mod cache;
mod player;
mod sink;
mod types;

pub use backend::{MediaBackend, MediaHandle};
pub use cache::MediaCache;
pub use player::RodioBackend;
pub use types::{MediaEvent, MediaEventKind, Preload};

#[cfg(test)]
pub use types::MediaError;

#[cfg(test)]
pub(crate) mod fake;
