use crate::library::{Artwork, Track, TrackMetadata};

/// What the page shows for one track. Starts as a copy of the loaded
/// `Track`; enrichment overwrites fields independently.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLabels {
    pub title: String,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<f64>,
    pub artwork: Option<Artwork>,
}

impl From<&Track> for TrackLabels {
    fn from(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            album: track.album.clone(),
            artist: track.artist.clone(),
            duration: track.duration,
            artwork: track.artwork.clone(),
        }
    }
}

impl TrackLabels {
    /// Album text, empty when there is none.
    pub fn album_text(&self) -> &str {
        self.album.as_deref().unwrap_or("")
    }

    /// Overwrite every field `metadata` carries; absent fields keep their
    /// current value.
    pub fn merge(&mut self, metadata: TrackMetadata) {
        if let Some(title) = metadata.title {
            self.title = title;
        }
        if let Some(album) = metadata.album {
            self.album = Some(album);
        }
        if let Some(artist) = metadata.artist {
            self.artist = Some(artist);
        }
        if let Some(duration) = metadata.duration.filter(|d| d.is_finite() && *d > 0.0) {
            self.duration = Some(duration);
        }
        if let Some(artwork) = metadata.artwork {
            self.artwork = Some(artwork);
        }
    }
}
