//! Reflection of controller state into the UI port.

use super::controller::PlayerController;
use crate::audio::MediaBackend;
use crate::ui::{Element, Progress, UiPort, class, format_time, is_visible, marquee, style};

impl<B: MediaBackend, U: UiPort> PlayerController<B, U> {
    pub(super) fn write_row_labels(&mut self, index: usize) {
        let title = self.labels[index].title.clone();
        let album = self.labels[index].album_text().to_string();
        self.ui.set_text(Element::TrackTitle(index), &title);
        self.ui.set_text(Element::TrackAlbum(index), &album);
    }

    pub(super) fn mark_active_row(&mut self, index: usize) {
        for i in 0..self.tracks.len() {
            self.ui.set_class(Element::TrackRow(i), class::ACTIVE, i == index);
        }
    }

    /// Now-playing and miniplayer title/album from the row's labels.
    pub(super) fn write_now_playing(&mut self, index: usize) {
        let title = self.labels[index].title.clone();
        let album = self.labels[index].album_text().to_string();
        self.ui.set_text(Element::NowPlayingTitle, &title);
        self.ui.set_text(Element::NowPlayingAlbum, &album);
        self.ui.set_text(Element::MiniTitle, &title);
        self.ui.set_text(Element::MiniAlbum, &album);
    }

    pub(super) fn show_artwork(&mut self, index: usize) {
        let artwork = self.labels.get(index).and_then(|l| l.artwork.clone());
        for el in [Element::NowPlayingArtwork, Element::MiniArtwork] {
            self.ui.set_artwork(el, artwork.as_ref());
            self.ui.set_class(el, class::VISIBLE, artwork.is_some());
        }
    }

    pub(super) fn clear_artwork(&mut self) {
        for el in [Element::NowPlayingArtwork, Element::MiniArtwork] {
            self.ui.set_artwork(el, None);
            self.ui.set_class(el, class::VISIBLE, false);
        }
    }

    pub(super) fn update_play_buttons(&mut self) {
        let playing = self.session.is_playing();
        self.ui.set_class(Element::PlayButton, class::PLAYING, playing);
        self.ui.set_class(Element::MiniPlayButton, class::PLAYING, playing);
    }

    /// One progress snapshot, written to the main player and the miniplayer.
    pub(super) fn reflect_progress(&mut self) {
        let progress = Progress::new(self.session.position, self.session.duration);
        let width = progress.width();
        self.ui.set_style(Element::Progress, style::WIDTH, &width);
        self.ui.set_text(Element::CurrentTime, &progress.current);
        self.ui.set_text(Element::TotalTime, &progress.total);
        self.ui.set_style(Element::MiniProgressFill, style::WIDTH, &width);
        self.ui.set_text(Element::MiniCurrent, &progress.current);
        self.ui.set_text(Element::MiniTotal, &progress.total);
    }

    pub(super) fn reset_progress(&mut self) {
        for el in [Element::CurrentTime, Element::MiniCurrent] {
            self.ui.set_text(el, "0:00");
        }
        for el in [Element::Progress, Element::MiniProgressFill] {
            self.ui.set_style(el, style::WIDTH, "0%");
        }
    }

    pub(super) fn write_total(&mut self, duration: f64) {
        let text = format_time(duration.floor());
        self.ui.set_text(Element::TotalTime, &text);
        self.ui.set_text(Element::MiniTotal, &text);
    }

    /// Show the miniplayer only while playing with the main controls off screen.
    pub(super) fn update_miniplayer_visibility(&mut self) {
        if !self.features.miniplayer {
            return;
        }
        if !self.session.is_playing() {
            self.ui.set_class(Element::Miniplayer, class::VISIBLE, false);
            return;
        }
        let controls_visible = self
            .ui
            .bounds(Element::PlayerControls)
            .is_some_and(|b| is_visible(b, self.ui.viewport_height(), self.nav_offset));
        self.ui
            .set_class(Element::Miniplayer, class::VISIBLE, !controls_visible);
    }

    #[cfg(test)]
    pub fn miniplayer_visible(&self) -> bool {
        self.ui.has_class(Element::Miniplayer, class::VISIBLE)
    }

    fn scroll_duration_value(&self, width: f64) -> String {
        let secs = marquee::scroll_duration(
            width,
            self.marquee.rate_per_second,
            self.marquee.min_duration_secs,
        );
        format!("{secs}s")
    }

    /// Start scrolling the row's title and album where they overflow.
    pub(super) fn enable_row_marquee(&mut self, index: usize) {
        if !self.features.marquee {
            return;
        }
        let Some(info) = self.ui.measure(Element::TrackInfo(index)) else {
            return;
        };
        let has_album = self
            .ui
            .text(Element::TrackAlbum(index))
            .is_some_and(|t| !marquee::clean(&t).trim().is_empty());
        let title_max = if has_album {
            info.client_width * self.marquee.title_share_with_album
        } else {
            info.client_width
        };

        let title = Element::TrackTitle(index);
        let title_wrapper = Element::TrackTitleWrapper(index);
        if self.ui.exists(title_wrapper) {
            if let Some(ext) = self.ui.measure(title) {
                if marquee::overflows(ext.scroll_width, title_max) {
                    self.enable_scrolling(title, title_wrapper);
                }
            }
        }

        let album = Element::TrackAlbum(index);
        let album_wrapper = Element::TrackAlbumWrapper(index);
        if has_album {
            if let (Some(ext), Some(wrapper)) =
                (self.ui.measure(album), self.ui.measure(album_wrapper))
            {
                if marquee::overflows(ext.scroll_width, wrapper.client_width) {
                    self.enable_scrolling(album, album_wrapper);
                }
            }
        }
    }

    fn enable_scrolling(&mut self, text_el: Element, wrapper: Element) {
        if self.ui.has_class(text_el, class::SCROLLING) {
            return;
        }
        let Some(text) = self.ui.text(text_el) else {
            return;
        };
        let width = self
            .ui
            .measure(text_el)
            .map(|e| e.scroll_width)
            .unwrap_or(0.0);

        let duration = self.scroll_duration_value(width);
        self.ui.set_style(text_el, style::SCROLL_DURATION, &duration);
        self.ui.set_class(wrapper, class::SCROLL_ACTIVE, true);
        self.ui
            .set_text(text_el, &marquee::duplicate(marquee::clean(&text)));
        self.ui.set_class(text_el, class::SCROLLING, true);
    }

    /// Restore the row's clean text and stop scrolling.
    pub(super) fn stop_row_marquee(&mut self, index: usize) {
        for (text_el, wrapper) in [
            (Element::TrackTitle(index), Element::TrackTitleWrapper(index)),
            (Element::TrackAlbum(index), Element::TrackAlbumWrapper(index)),
        ] {
            if self.ui.has_class(text_el, class::SCROLLING) {
                self.ui.set_class(text_el, class::SCROLLING, false);
                if let Some(text) = self.ui.text(text_el) {
                    let clean = marquee::clean(&text).to_string();
                    self.ui.set_text(text_el, &clean);
                }
            }
            self.ui.set_class(wrapper, class::SCROLL_ACTIVE, false);
        }
    }

    /// Re-evaluate the miniplayer text marquee from clean text.
    pub(super) fn refresh_mini_marquee(&mut self) {
        if !self.ui.exists(Element::MiniTextWrapper) {
            return;
        }
        self.ui
            .set_class(Element::MiniTextWrapper, class::SCROLLING, false);
        for el in [Element::MiniTitle, Element::MiniAlbum] {
            if let Some(text) = self.ui.text(el) {
                let clean = marquee::clean(&text).to_string();
                self.ui.set_text(el, &clean);
            }
        }

        let (Some(wrapper), Some(info)) = (
            self.ui.measure(Element::MiniTextWrapper),
            self.ui.measure(Element::MiniInfo),
        ) else {
            return;
        };
        if !marquee::overflows(wrapper.scroll_width, info.client_width) {
            return;
        }

        for el in [Element::MiniTitle, Element::MiniAlbum] {
            if let Some(text) = self.ui.text(el) {
                if !text.is_empty() {
                    self.ui.set_text(el, &marquee::duplicate(&text));
                }
            }
        }
        let duration = self.scroll_duration_value(wrapper.scroll_width);
        self.ui
            .set_style(Element::MiniTextWrapper, style::SCROLL_DURATION, &duration);
        self.ui
            .set_class(Element::MiniTextWrapper, class::SCROLLING, true);
    }

    /// Expand or collapse the track list.
    pub fn toggle_track_list(&mut self) {
        if !self.features.track_list_toggle {
            return;
        }
        let expanded = !self.ui.has_class(Element::TrackList, class::EXPANDED);
        self.ui.set_class(Element::TrackList, class::EXPANDED, expanded);
        self.ui
            .set_class(Element::TrackListToggle, class::EXPANDED, expanded);
        self.ui.set_text(
            Element::TrackListToggle,
            if expanded { "Show Less" } else { "Show More" },
        );
        self.update_miniplayer_visibility();
    }
}
