//! Track library: the static track model, directory scanning, the optional
//! `tracks.json` manifest and background tag enrichment.
//!
//! Tracks are loaded once at startup and never mutated afterwards. Richer
//! metadata (tags, artwork) arrives later as `MetadataEvent`s and is applied
//! to display labels by the player controller, never to `Track` itself.

mod error;
mod fallback;
mod manifest;
mod model;
mod scan;
mod tags;

use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;

pub use error::LibraryError;
pub use manifest::Manifest;
pub use model::{Artwork, Track, TrackMetadata};
pub use scan::scan;
pub use tags::{MetadataEvent, spawn_tag_reader};

#[cfg(test)]
pub use fallback::{fallback_title, track_number};

/// Where the loaded tracks came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    Manifest(PathBuf),
    Scan,
}

pub struct Library {
    pub tracks: Vec<Track>,
    pub source: TrackSource,
}

impl Library {
    /// Tag reading only runs for scanned libraries; a manifest already carries
    /// everything the tags would.
    pub fn needs_tag_reading(&self, settings: &LibrarySettings) -> bool {
        settings.read_tags && self.source == TrackSource::Scan && !self.tracks.is_empty()
    }

    /// `(index, path)` pairs for the tag reader.
    pub fn tag_jobs(&self) -> Vec<(usize, PathBuf)> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.src.clone()))
            .collect()
    }
}

/// Load the library from `dir`, preferring `<dir>/<manifest_name>` and
/// falling back to a directory scan when the manifest is absent or invalid.
pub fn load(dir: &Path, settings: &LibrarySettings) -> Library {
    let manifest_path = dir.join(&settings.manifest_name);

    if manifest_path.is_file() {
        match Manifest::load(&manifest_path) {
            Ok(manifest) => {
                if let Some(count) = manifest.track_count {
                    if count != manifest.tracks.len() {
                        tracing::warn!(
                            declared = count,
                            actual = manifest.tracks.len(),
                            "manifest trackCount does not match its track list"
                        );
                    }
                }
                let tracks = manifest.into_tracks(&manifest_path, &settings.extensions);
                tracing::info!(
                    tracks = tracks.len(),
                    path = %manifest_path.display(),
                    "loaded track manifest"
                );
                return Library {
                    tracks,
                    source: TrackSource::Manifest(manifest_path),
                };
            }
            Err(e) => {
                tracing::warn!("{e}; falling back to directory scan");
            }
        }
    }

    let tracks = scan(dir, settings);
    tracing::info!(tracks = tracks.len(), dir = %dir.display(), "scanned audio directory");
    Library {
        tracks,
        source: TrackSource::Scan,
    }
}
