//! The player controller: transport state machine over a lazy handle cache.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::labels::TrackLabels;
use super::session::{PlaybackSession, TransportState, next_index, previous_index};
use crate::audio::{MediaBackend, MediaCache, MediaEvent, MediaEventKind, MediaHandle, Preload};
use crate::config::{MarqueeSettings, PlayerSettings, Settings};
use crate::library::Track;
use crate::ui::{Element, Key, UiEvent, UiPort, format_time};

/// Which page features found the elements they depend on.
///
/// A missing element disables only the feature that needs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    /// Main transport: buttons, rows, progress bar and keys.
    pub transport: bool,
    pub marquee: bool,
    pub miniplayer: bool,
    pub track_list_toggle: bool,
}

/// Neighbor preload waiting for its delay to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PendingPreload {
    pub index: usize,
    pub due: Instant,
}

pub struct PlayerController<B: MediaBackend, U: UiPort> {
    pub(super) tracks: Vec<Track>,
    pub(super) labels: Vec<TrackLabels>,
    pub(super) session: PlaybackSession,
    pub(super) cache: MediaCache<B::Handle>,
    pub(super) backend: B,
    pub(super) ui: U,
    pub(super) features: Features,
    pub(super) player: PlayerSettings,
    pub(super) marquee: MarqueeSettings,
    pub(super) nav_offset: f64,
    pub(super) pending_preload: Option<PendingPreload>,
    /// Row under the pointer, if any.
    pub(super) hovered: Option<usize>,
}

impl<B: MediaBackend, U: UiPort> PlayerController<B, U> {
    pub fn new(tracks: Vec<Track>, backend: B, ui: U, settings: &Settings) -> Self {
        let labels = tracks.iter().map(TrackLabels::from).collect();
        Self {
            tracks,
            labels,
            session: PlaybackSession::default(),
            cache: MediaCache::new(),
            backend,
            ui,
            features: Features::default(),
            player: settings.player.clone(),
            marquee: settings.marquee.clone(),
            nav_offset: settings.miniplayer.nav_offset as f64,
            pending_preload: None,
            hovered: None,
        }
    }

    /// Detect features and write the initial labels into the page.
    pub fn init(&mut self) {
        self.features = self.detect_features();

        for i in 0..self.tracks.len() {
            self.write_row_labels(i);
            self.write_row_duration(i);
        }
        if !self.tracks.is_empty() {
            self.mark_active_row(0);
            self.write_now_playing(0);
            self.session.duration = self.labels[0].duration.unwrap_or(f64::NAN);
        }
        self.reflect_progress();
        self.clear_artwork();
        if self.features.track_list_toggle {
            self.ui.set_text(Element::TrackListToggle, "Show More");
        }

        info!(
            tracks = self.tracks.len(),
            features = ?self.features,
            "player initialised"
        );
    }

    fn detect_features(&self) -> Features {
        let transport = self.ui.exists(Element::PlayButton);
        if !transport {
            warn!("play button missing; transport controls disabled");
        }

        let marquee = (0..self.tracks.len()).any(|i| self.ui.exists(Element::TrackInfo(i)));
        if !marquee && !self.tracks.is_empty() {
            warn!("track info columns missing; marquee disabled");
        }

        let miniplayer =
            self.ui.exists(Element::Miniplayer) && self.ui.exists(Element::PlayerControls);
        if !miniplayer {
            warn!("miniplayer or player controls missing; miniplayer disabled");
        }

        let track_list_toggle =
            self.ui.exists(Element::TrackList) && self.ui.exists(Element::TrackListToggle);
        if !track_list_toggle {
            debug!("track list toggle missing");
        }

        Features {
            transport,
            marquee,
            miniplayer,
            track_list_toggle,
        }
    }

    /// Cached handle for `index`, created on first use.
    fn acquire(&mut self, index: usize) -> &mut B::Handle {
        if !self.cache.contains(index) {
            debug!(index, "creating media handle");
        }
        let known = self.labels[index].duration;
        self.cache
            .get_or_create(index, || self.backend.create(index, &self.tracks[index], known))
    }

    /// Play the current track if paused or idle, otherwise pause it.
    pub fn toggle_play(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let current = self.session.current;

        if self.session.is_playing() {
            if let Some(handle) = self.cache.get_mut(current) {
                handle.pause();
            }
            self.session.state = TransportState::Paused;
            self.update_play_buttons();
            self.update_miniplayer_visibility();
            self.stop_row_marquee(current);
            return;
        }

        if self.session.interact() {
            self.show_artwork(current);
        }
        self.start_current();
    }

    /// Request playback of the current handle and settle the transport state.
    fn start_current(&mut self) {
        let current = self.session.current;
        let result = self.acquire(current).play();
        match result {
            Ok(()) => {
                self.session.state = TransportState::Playing;
                self.update_play_buttons();
                self.update_miniplayer_visibility();
                self.enable_row_marquee(current);
                self.schedule_preload(current);
            }
            Err(e) => {
                warn!(index = current, error = %e, "playback failed");
                self.session.state = TransportState::Paused;
                self.update_play_buttons();
                self.update_miniplayer_visibility();
            }
        }
    }

    /// Make `index` current and start it. Out-of-range indices are ignored.
    pub fn select_track(&mut self, index: usize) {
        if index >= self.tracks.len() {
            warn!(index, tracks = self.tracks.len(), "ignoring selection out of range");
            return;
        }

        let previous = self.session.current;
        self.stop_row_marquee(previous);
        if self.session.state != TransportState::Idle {
            if let Some(handle) = self.cache.get_mut(previous) {
                handle.pause();
                handle.set_position(0.0);
            }
        }

        self.session.current = index;
        self.mark_active_row(index);
        self.write_now_playing(index);
        self.session.interact();
        self.show_artwork(index);
        self.refresh_mini_marquee();

        self.session.position = 0.0;
        self.session.duration = f64::NAN;
        self.reset_progress();

        let known = self.acquire(index).duration();
        if let Some(duration) = known.filter(|d| d.is_finite() && *d > 0.0) {
            self.session.duration = duration;
            self.write_total(duration);
        }

        info!(index, title = %self.labels[index].title, "track selected");
        self.start_current();
    }

    pub fn play_next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.select_track(next_index(self.session.current, self.tracks.len()));
    }

    pub fn play_previous(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.select_track(previous_index(self.session.current, self.tracks.len()));
    }

    /// Jump to `fraction` (clamped to `[0, 1]`) of the current track. Needs a
    /// handle with a known duration; play/pause state is untouched.
    pub fn seek(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let current = self.session.current;
        let Some(handle) = self.cache.get_mut(current) else {
            return;
        };
        let Some(duration) = handle.duration().filter(|d| d.is_finite() && *d > 0.0) else {
            return;
        };

        let position = fraction.clamp(0.0, 1.0) * duration;
        handle.set_position(position);
        self.session.position = position;
        self.session.duration = duration;
        self.reflect_progress();
    }

    /// Seek to where viewport column `x` falls on the progress bar.
    pub fn seek_at(&mut self, x: f64) {
        let Some(bar) = self.ui.bounds(Element::ProgressBar) else {
            return;
        };
        if bar.width <= 0.0 {
            return;
        }
        self.seek((x - bar.left) / bar.width);
    }

    pub fn on_media_event(&mut self, event: MediaEvent) {
        let MediaEvent { index, kind } = event;
        match kind {
            MediaEventKind::LoadedMetadata { duration } => {
                if !duration.is_finite() || duration <= 0.0 {
                    return;
                }
                if let Some(labels) = self.labels.get_mut(index) {
                    labels.duration = Some(duration);
                }
                self.write_row_duration(index);
                if index == self.session.current {
                    self.session.duration = duration;
                    self.write_total(duration);
                }
            }
            MediaEventKind::TimeUpdate => {
                if index != self.session.current {
                    return;
                }
                if let Some(handle) = self.cache.get(index) {
                    self.session.position = handle.position();
                    if let Some(d) = handle.duration() {
                        self.session.duration = d;
                    }
                }
                self.reflect_progress();
            }
            MediaEventKind::Ended => {
                if index != self.session.current {
                    debug!(index, "ignoring end of a track that is no longer current");
                    return;
                }
                self.play_next();
            }
            MediaEventKind::Error(message) => {
                warn!(index, error = %message, "media error");
            }
        }
    }

    /// Dispatch every event queued on cached handles.
    pub fn poll_media(&mut self) {
        for event in self.cache.drain_events() {
            self.on_media_event(event);
        }
    }

    fn schedule_preload(&mut self, index: usize) {
        if !self.player.preload_neighbors {
            return;
        }
        self.pending_preload = Some(PendingPreload {
            index,
            due: Instant::now() + Duration::from_millis(self.player.preload_delay_ms),
        });
    }

    /// Run a neighbor preload whose delay has passed.
    pub fn tick(&mut self, now: Instant) {
        match self.pending_preload {
            Some(pending) if now >= pending.due => {
                self.pending_preload = None;
                self.preload_neighbors(pending.index);
            }
            _ => {}
        }
    }

    /// Acquire the handles either side of `index` and let them buffer.
    /// Does nothing before the first interaction.
    pub fn preload_neighbors(&mut self, index: usize) {
        let len = self.tracks.len();
        if !self.session.interacted || index >= len {
            return;
        }
        for neighbor in [next_index(index, len), previous_index(index, len)] {
            let handle = self.acquire(neighbor);
            if handle.preload() == Preload::Metadata {
                handle.set_preload(Preload::Auto);
                debug!(index = neighbor, "preloading neighbor");
            }
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        let transport = self.features.transport;
        let mini = self.features.miniplayer;
        match event {
            UiEvent::Click(Element::PlayButton) if transport => self.toggle_play(),
            UiEvent::Click(Element::PrevButton) if transport => self.play_previous(),
            UiEvent::Click(Element::NextButton) if transport => self.play_next(),
            UiEvent::Click(Element::MiniPlayButton) if mini => self.toggle_play(),
            UiEvent::Click(Element::MiniPrevButton) if mini => self.play_previous(),
            UiEvent::Click(Element::MiniNextButton) if mini => self.play_next(),
            UiEvent::Click(Element::TrackRow(i)) if transport => self.select_track(i),
            UiEvent::Click(Element::TrackListToggle) => self.toggle_track_list(),
            UiEvent::Click(_) => {}
            UiEvent::ProgressClick { x } if transport => self.seek_at(x),
            UiEvent::ProgressClick { .. } => {}
            UiEvent::HoverEnter(i) => {
                self.hovered = Some(i);
                self.enable_row_marquee(i);
            }
            UiEvent::HoverLeave(i) => {
                if self.hovered == Some(i) {
                    self.hovered = None;
                }
                if i != self.session.current || !self.session.is_playing() {
                    self.stop_row_marquee(i);
                }
            }
            UiEvent::Key { text_focus: true, .. } => {}
            UiEvent::Key { .. } if !transport => {}
            UiEvent::Key { key, .. } => match key {
                Key::Space => self.toggle_play(),
                Key::Left => self.play_previous(),
                Key::Right => self.play_next(),
            },
            UiEvent::Scroll => self.update_miniplayer_visibility(),
            UiEvent::Resize => {
                self.update_miniplayer_visibility();
                self.refresh_mini_marquee();
            }
        }
    }

    pub(super) fn write_row_duration(&mut self, index: usize) {
        let text = match self.labels.get(index).and_then(|l| l.duration) {
            Some(d) => format_time(d.floor()),
            None => crate::ui::UNKNOWN_TIME.to_string(),
        };
        self.ui.set_text(Element::TrackDuration(index), &text);
    }

    #[cfg(test)]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn current(&self) -> usize {
        self.session.current
    }

    pub fn state(&self) -> TransportState {
        self.session.state
    }

    #[cfg(test)]
    pub fn features(&self) -> Features {
        self.features
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn labels(&self, index: usize) -> Option<&TrackLabels> {
        self.labels.get(index)
    }

    #[cfg(test)]
    pub fn handle(&self, index: usize) -> Option<&B::Handle> {
        self.cache.get(index)
    }

    #[cfg(test)]
    pub fn cached_handles(&self) -> usize {
        self.cache.len()
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }
}
