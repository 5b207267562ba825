//! Media-related small types: preload hints, handle events and errors.

use std::path::PathBuf;

use thiserror::Error;

/// How eagerly a handle loads its source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Preload {
    /// Only the duration is known; nothing is decoded yet.
    #[default]
    Metadata,
    /// The source is opened and buffered, ready to start.
    Auto,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Duration became known (seconds).
    LoadedMetadata { duration: f64 },
    /// Playback position advanced.
    TimeUpdate,
    /// The source played to its end.
    Ended,
    /// Loading failed in the background; the handle stays usable but silent.
    Error(String),
}

/// An event raised by the handle cached for `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub index: usize,
    pub kind: MediaEventKind,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device: {0}")]
    NoOutput(#[from] rodio::StreamError),
}
