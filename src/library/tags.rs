use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use lofty::prelude::*;

use super::error::LibraryError;
use super::model::{Artwork, TrackMetadata};

/// Result of reading one track's tags on the background reader.
#[derive(Debug)]
pub enum MetadataEvent {
    Loaded { index: usize, metadata: TrackMetadata },
    Failed { index: usize, error: LibraryError },
}

fn non_blank(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Read title, album, artist, duration and the first embedded picture.
pub fn read_tags(path: &Path) -> Result<TrackMetadata, LibraryError> {
    let tagged = lofty::read_from_path(path).map_err(|e| LibraryError::Tags {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let secs = tagged.properties().duration().as_secs_f64();
    let mut metadata = TrackMetadata {
        duration: (secs > 0.0).then_some(secs),
        ..TrackMetadata::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        metadata.title = non_blank(tag.title());
        metadata.album = non_blank(tag.album());
        metadata.artist = non_blank(tag.artist());
        metadata.artwork = tag.pictures().first().map(|picture| Artwork::Embedded {
            mime: picture
                .mime_type()
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            data: picture.data().to_vec(),
        });
    }

    Ok(metadata)
}

/// Read tags for every job on a background thread, in order, and stream the
/// results back. The receiver sees the channel close once all jobs are done.
pub fn spawn_tag_reader(jobs: Vec<(usize, PathBuf)>) -> Receiver<MetadataEvent> {
    let (tx, rx) = mpsc::channel::<MetadataEvent>();

    thread::spawn(move || {
        for (index, path) in jobs {
            let event = match read_tags(&path) {
                Ok(metadata) => MetadataEvent::Loaded { index, metadata },
                Err(error) => MetadataEvent::Failed { index, error },
            };
            if tx.send(event).is_err() {
                // Receiver gone: the UI has shut down.
                break;
            }
        }
    });

    rx
}
