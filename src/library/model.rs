use std::path::PathBuf;

/// Album art attached to a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    /// Image file on disk, referenced by the manifest.
    File(PathBuf),
    /// Picture embedded in the audio file's tags.
    Embedded { mime: String, data: Vec<u8> },
}

impl Artwork {
    /// Short human-readable description for text-only surfaces.
    pub fn describe(&self) -> String {
        match self {
            Artwork::File(path) => path
                .file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| path.display().to_string()),
            Artwork::Embedded { mime, data } => {
                format!("{} ({} KiB)", mime, data.len().div_ceil(1024))
            }
        }
    }
}

/// A track as loaded at startup. Immutable afterwards.
#[derive(Debug, Clone)]
pub struct Track {
    pub src: PathBuf,
    pub title: String,
    pub album: Option<String>,
    pub artist: Option<String>,
    /// Seconds.
    pub duration: Option<f64>,
    pub artwork: Option<Artwork>,
}

/// Metadata resolved after load. Every field is optional; only present
/// fields overwrite the current labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<f64>,
    pub artwork: Option<Artwork>,
}
