//! Late metadata: tag reads that finish after the page is up.

use tracing::{debug, warn};

use super::controller::PlayerController;
use crate::audio::MediaBackend;
use crate::library::{LibraryError, TrackMetadata};
use crate::ui::{Element, UiPort, class};

impl<B: MediaBackend, U: UiPort> PlayerController<B, U> {
    /// Overwrite the labels of row `index`. Now-playing text follows when the
    /// row is current; transport state is never touched.
    pub fn apply_metadata(&mut self, index: usize, metadata: TrackMetadata) {
        let Some(labels) = self.labels.get_mut(index) else {
            warn!(index, "metadata for unknown track");
            return;
        };
        let has_artwork = metadata.artwork.is_some();
        let has_duration = metadata.duration.is_some();
        labels.merge(metadata);
        debug!(index, title = %labels.title, "metadata applied");

        let scrolling = self.ui.has_class(Element::TrackTitle(index), class::SCROLLING)
            || self.ui.has_class(Element::TrackAlbum(index), class::SCROLLING);
        if scrolling {
            self.stop_row_marquee(index);
        }
        self.write_row_labels(index);
        if has_duration {
            self.write_row_duration(index);
        }

        let current = index == self.session.current;
        let keep_scrolling =
            self.hovered == Some(index) || (current && self.session.is_playing());
        if scrolling && keep_scrolling {
            self.enable_row_marquee(index);
        }

        if !current {
            return;
        }
        self.write_now_playing(index);
        self.refresh_mini_marquee();
        if has_duration && !self.cache.contains(index) {
            if let Some(duration) = self.labels[index].duration {
                self.session.duration = duration;
                self.write_total(duration);
            }
        }
        if self.session.interacted && has_artwork {
            self.show_artwork(index);
        }
    }

    /// A tag read failed; the row keeps its current labels.
    pub fn metadata_failed(&mut self, index: usize, error: &LibraryError) {
        warn!(index, error = %error, "could not read track metadata");
    }
}
