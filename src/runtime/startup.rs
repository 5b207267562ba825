use std::env;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use tracing::info;

use crate::config::LibrarySettings;
use crate::library::{Library, MetadataEvent, spawn_tag_reader};

/// Audio directory: first CLI argument, then `library.dir`, then the cwd.
pub fn audio_dir(settings: &LibrarySettings) -> PathBuf {
    env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.dir.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Start background tag reading when the library came from a scan.
pub fn spawn_enrichment(
    library: &Library,
    settings: &LibrarySettings,
) -> Option<Receiver<MetadataEvent>> {
    if !library.needs_tag_reading(settings) {
        return None;
    }
    info!(tracks = library.tracks.len(), "reading tags in background");
    Some(spawn_tag_reader(library.tag_jobs()))
}
