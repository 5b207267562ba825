use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::LibraryError;
use super::fallback::fallback_title;
use super::model::{Artwork, Track};

/// The `tracks.json` document produced by the site's offline generator.
///
/// Tracks are already ordered by track number; paths are relative to the
/// site root (e.g. `audio/01 Breath.mp3`, `artwork/breath.webp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub generated: Option<String>,
    #[serde(default)]
    pub track_count: Option<usize>,
    pub tracks: Vec<ManifestTrack>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestTrack {
    pub src: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub artist: String,
    /// Whole seconds; `0` means the generator could not read it.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub artwork: Option<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let raw = fs::read_to_string(path).map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| LibraryError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Convert into tracks, resolving paths relative to the manifest location.
    pub fn into_tracks(self, manifest_path: &Path, extensions: &[String]) -> Vec<Track> {
        let manifest_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        self.tracks
            .into_iter()
            .map(|t| {
                let src = resolve(manifest_dir, &t.src);
                let title = if t.title.trim().is_empty() {
                    let file_name = src
                        .file_name()
                        .and_then(|s| s.to_str())
                        .unwrap_or(t.src.as_str());
                    fallback_title(file_name, extensions)
                } else {
                    t.title
                };

                Track {
                    src,
                    title,
                    album: non_empty(t.album),
                    artist: non_empty(t.artist),
                    duration: t.duration.filter(|d| d.is_finite() && *d > 0.0),
                    artwork: t
                        .artwork
                        .filter(|a| !a.trim().is_empty())
                        .map(|a| Artwork::File(resolve(manifest_dir, &a))),
                }
            })
            .collect()
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Resolve a site-relative path: first against the site root (the manifest
/// directory's parent), then against the manifest directory by file name.
fn resolve(manifest_dir: &Path, rel: &str) -> PathBuf {
    let rel_path = Path::new(rel);
    if rel_path.is_absolute() {
        return rel_path.to_path_buf();
    }

    if let Some(root) = manifest_dir.parent() {
        let candidate = root.join(rel_path);
        if candidate.exists() {
            return candidate;
        }
    }

    match rel_path.file_name() {
        Some(name) => manifest_dir.join(name),
        None => manifest_dir.join(rel_path),
    }
}
