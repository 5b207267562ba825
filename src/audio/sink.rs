//! Utilities for creating `rodio` sinks from track files.
//!
//! Seeking rebuilds the sink: the decoder is reopened and `skip_duration`
//! moves it to the target, so backward seeks work for every format.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use super::types::MediaError;

/// Open `path` for decoding. Built from the `File` so the decoder knows the
/// byte length and can seek randomly.
pub(super) fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::try_from(file).map_err(|source| MediaError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Source for `path` starting `start_at` into the file, with the decoder's
/// idea of the total duration.
pub(super) fn source_at(
    path: &Path,
    start_at: Duration,
) -> Result<(impl Source + Send + 'static, Option<Duration>), MediaError> {
    let decoder = open_decoder(path)?;
    let total = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    Ok((decoder.skip_duration(start_at), total))
}

/// Create a paused `Sink` for `path` positioned at `start_at`.
pub(super) fn create_sink_at(
    mixer: &Mixer,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), MediaError> {
    let (source, total) = source_at(path, start_at)?;

    let sink = Sink::connect_new(mixer);
    sink.append(source);
    sink.pause();

    Ok((sink, total))
}
