use super::*;
use crate::audio::fake::{FakeBackend, FakeLog};
use crate::audio::{MediaEvent, MediaEventKind, Preload};
use crate::config::Settings;
use crate::library::{Artwork, LibraryError, Track, TrackMetadata};
use crate::ui::{Bounds, Element, Extent, Key, UiEvent, UiPort, class, marquee, style};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
struct FakeNode {
    text: String,
    classes: HashSet<String>,
    styles: HashMap<String, String>,
    artwork: Option<Artwork>,
}

/// Node map with fixed geometry: containers get explicit client widths,
/// text measures one unit per character.
#[derive(Debug, Default)]
struct FakePage {
    nodes: HashMap<Element, FakeNode>,
    widths: HashMap<Element, f64>,
    bounds: HashMap<Element, Bounds>,
    viewport: f64,
}

impl FakePage {
    fn new(tracks: usize) -> Self {
        use Element::*;

        let mut page = FakePage {
            viewport: 40.0,
            ..Default::default()
        };
        for el in [
            PlayButton,
            PrevButton,
            NextButton,
            ProgressBar,
            Progress,
            CurrentTime,
            TotalTime,
            NowPlayingTitle,
            NowPlayingAlbum,
            NowPlayingArtwork,
            PlayerControls,
            TrackList,
            TrackListToggle,
            Miniplayer,
            MiniInfo,
            MiniTextWrapper,
            MiniTitle,
            MiniAlbum,
            MiniArtwork,
            MiniPlayButton,
            MiniPrevButton,
            MiniNextButton,
            MiniCurrent,
            MiniTotal,
            MiniProgressFill,
        ] {
            page.nodes.insert(el, FakeNode::default());
        }
        for i in 0..tracks {
            for el in [
                TrackRow(i),
                TrackInfo(i),
                TrackTitleWrapper(i),
                TrackTitle(i),
                TrackAlbumWrapper(i),
                TrackAlbum(i),
                TrackDuration(i),
            ] {
                page.nodes.insert(el, FakeNode::default());
            }
            page.nodes.get_mut(&TrackTitle(i)).unwrap().text = "Loading...".into();
            page.widths.insert(TrackInfo(i), 20.0);
            page.widths.insert(TrackAlbumWrapper(i), 4.0);
        }
        page.widths.insert(MiniInfo, 20.0);
        page.bounds.insert(
            ProgressBar,
            Bounds {
                left: 10.0,
                top: 20.0,
                width: 100.0,
                height: 1.0,
            },
        );
        page.place_controls(10.0);
        page
    }

    fn place_controls(&mut self, top: f64) {
        self.bounds.insert(
            Element::PlayerControls,
            Bounds {
                left: 0.0,
                top,
                width: 80.0,
                height: 3.0,
            },
        );
    }

    fn node(&self, el: Element) -> &FakeNode {
        &self.nodes[&el]
    }

    fn text_of(&self, el: Element) -> &str {
        &self.nodes[&el].text
    }

    fn style_of(&self, el: Element, prop: &str) -> Option<&str> {
        self.nodes[&el].styles.get(prop).map(String::as_str)
    }

    fn chars(&self, el: Element) -> f64 {
        self.nodes
            .get(&el)
            .map(|n| n.text.chars().count() as f64)
            .unwrap_or(0.0)
    }
}

impl UiPort for FakePage {
    fn exists(&self, el: Element) -> bool {
        self.nodes.contains_key(&el)
    }

    fn text(&self, el: Element) -> Option<String> {
        self.nodes.get(&el).map(|n| n.text.clone())
    }

    fn set_text(&mut self, el: Element, text: &str) {
        if let Some(n) = self.nodes.get_mut(&el) {
            n.text = text.to_string();
        }
    }

    fn has_class(&self, el: Element, class: &str) -> bool {
        self.nodes.get(&el).is_some_and(|n| n.classes.contains(class))
    }

    fn set_class(&mut self, el: Element, class: &str, on: bool) {
        if let Some(n) = self.nodes.get_mut(&el) {
            if on {
                n.classes.insert(class.to_string());
            } else {
                n.classes.remove(class);
            }
        }
    }

    fn set_style(&mut self, el: Element, prop: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(&el) {
            n.styles.insert(prop.to_string(), value.to_string());
        }
    }

    fn set_artwork(&mut self, el: Element, artwork: Option<&Artwork>) {
        if let Some(n) = self.nodes.get_mut(&el) {
            n.artwork = artwork.cloned();
        }
    }

    fn measure(&self, el: Element) -> Option<Extent> {
        if !self.exists(el) {
            return None;
        }
        let scroll_width = match el {
            Element::MiniTextWrapper => self
                .chars(Element::MiniTitle)
                .max(self.chars(Element::MiniAlbum)),
            _ => self.chars(el),
        };
        Some(Extent {
            scroll_width,
            client_width: self.widths.get(&el).copied().unwrap_or(scroll_width),
        })
    }

    fn bounds(&self, el: Element) -> Option<Bounds> {
        if !self.exists(el) {
            return None;
        }
        self.bounds.get(&el).copied()
    }

    fn viewport_height(&self) -> f64 {
        self.viewport
    }
}

type Controller = PlayerController<FakeBackend, FakePage>;

fn track(n: usize, title: &str, album: Option<&str>, duration: Option<f64>) -> Track {
    Track {
        src: PathBuf::from(format!("/music/{:02} {title}.mp3", n + 1)),
        title: title.to_string(),
        album: album.map(str::to_string),
        artist: None,
        duration,
        artwork: None,
    }
}

fn tracks(n: usize) -> Vec<Track> {
    (0..n)
        .map(|i| track(i, &format!("Piece {}", i + 1), None, Some(200.0)))
        .collect()
}

struct Rig {
    c: Controller,
    log: Rc<RefCell<FakeLog>>,
    failing: Rc<RefCell<HashSet<usize>>>,
}

fn rig_with(tracks: Vec<Track>, page: FakePage, settings: &Settings) -> Rig {
    let backend = FakeBackend::new();
    let log = backend.log();
    let failing = backend.failing();
    let mut c = PlayerController::new(tracks, backend, page, settings);
    c.init();
    Rig { c, log, failing }
}

fn rig(tracks: Vec<Track>) -> Rig {
    let n = tracks.len();
    rig_with(tracks, FakePage::new(n), &Settings::default())
}

fn later() -> Instant {
    Instant::now() + Duration::from_secs(60)
}

#[test]
fn init_replaces_placeholders_and_marks_first_row() {
    let r = rig(vec![
        track(0, "Overture", Some("Suite"), Some(184.0)),
        track(1, "Adagio", None, None),
    ]);
    let ui = r.c.ui();

    assert_eq!(ui.text_of(Element::TrackTitle(0)), "Overture");
    assert_eq!(ui.text_of(Element::TrackTitle(1)), "Adagio");
    assert_eq!(ui.text_of(Element::TrackAlbum(0)), "Suite");
    assert_eq!(ui.text_of(Element::TrackDuration(0)), "3:04");
    assert_eq!(ui.text_of(Element::TrackDuration(1)), "--:--");
    assert!(ui.has_class(Element::TrackRow(0), class::ACTIVE));
    assert!(!ui.has_class(Element::TrackRow(1), class::ACTIVE));
    assert_eq!(ui.text_of(Element::NowPlayingTitle), "Overture");
    assert_eq!(ui.text_of(Element::MiniAlbum), "Suite");
    assert_eq!(ui.text_of(Element::TotalTime), "3:04");
    assert_eq!(ui.text_of(Element::TrackListToggle), "Show More");
    assert_eq!(r.c.state(), TransportState::Idle);
    assert_eq!(r.c.cached_handles(), 0);
    assert_eq!(
        r.c.features(),
        Features {
            transport: true,
            marquee: true,
            miniplayer: true,
            track_list_toggle: true
        }
    );
}

#[test]
fn toggle_play_starts_then_pauses() {
    let mut r = rig(tracks(3));

    r.c.toggle_play();
    assert_eq!(r.c.state(), TransportState::Playing);
    assert!(r.c.session().interacted);
    assert!(r.c.ui().has_class(Element::PlayButton, class::PLAYING));
    assert!(r.c.ui().has_class(Element::MiniPlayButton, class::PLAYING));
    assert_eq!(r.log.borrow().created, vec![0]);
    assert_eq!(r.log.borrow().plays, vec![0]);

    r.c.toggle_play();
    assert_eq!(r.c.state(), TransportState::Paused);
    assert!(!r.c.ui().has_class(Element::PlayButton, class::PLAYING));
    assert_eq!(r.log.borrow().pauses, vec![0]);
    assert_eq!(r.log.borrow().created, vec![0]);
}

#[test]
fn rejected_play_leaves_paused() {
    let mut r = rig(tracks(2));
    r.failing.borrow_mut().insert(0);

    r.c.toggle_play();
    assert_eq!(r.c.state(), TransportState::Paused);
    assert!(!r.c.ui().has_class(Element::PlayButton, class::PLAYING));
    assert_eq!(r.c.cached_handles(), 1);

    r.failing.borrow_mut().clear();
    r.c.toggle_play();
    assert_eq!(r.c.state(), TransportState::Playing);
    assert_eq!(r.log.borrow().created, vec![0]);
}

#[test]
fn rejected_selection_still_moves_current() {
    let mut r = rig(tracks(3));
    r.failing.borrow_mut().insert(2);
    r.c.select_track(2);
    assert_eq!(r.c.current(), 2);
    assert_eq!(r.c.state(), TransportState::Paused);
}

#[test]
fn select_resets_previous_handle() {
    let mut r = rig(tracks(3));
    r.c.toggle_play();
    r.c.seek(0.5);
    assert_eq!(r.c.handle(0).unwrap().position, 100.0);

    r.c.select_track(2);
    let previous = r.c.handle(0).unwrap();
    assert!(!previous.playing);
    assert_eq!(previous.position, 0.0);
    assert!(r.c.handle(2).unwrap().playing);
    assert!(r.c.ui().has_class(Element::TrackRow(2), class::ACTIVE));
    assert!(!r.c.ui().has_class(Element::TrackRow(0), class::ACTIVE));
    assert_eq!(r.c.ui().text_of(Element::NowPlayingTitle), "Piece 3");
    assert_eq!(r.c.ui().text_of(Element::MiniTitle), "Piece 3");
    assert_eq!(r.c.ui().text_of(Element::CurrentTime), "0:00");
    assert_eq!(r.c.ui().style_of(Element::Progress, style::WIDTH), Some("0%"));
    assert_eq!(r.c.ui().text_of(Element::TotalTime), "3:20");
}

#[test]
fn select_from_idle_does_not_touch_other_handles() {
    let mut r = rig(tracks(3));
    r.c.select_track(1);
    assert_eq!(r.log.borrow().pauses, Vec::<usize>::new());
    assert_eq!(r.log.borrow().created, vec![1]);
    assert_eq!(r.c.state(), TransportState::Playing);
    assert!(r.c.session().interacted);
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut r = rig(tracks(2));
    r.c.select_track(5);
    assert_eq!(r.c.current(), 0);
    assert_eq!(r.c.state(), TransportState::Idle);
    assert_eq!(r.c.cached_handles(), 0);
}

#[test]
fn next_twice_then_wraps() {
    let mut r = rig(tracks(3));
    r.c.play_next();
    r.c.play_next();
    assert_eq!(r.c.current(), 2);
    r.c.play_next();
    assert_eq!(r.c.current(), 0);
}

#[test]
fn previous_from_first_wraps_to_last() {
    let mut r = rig(tracks(4));
    r.c.play_previous();
    assert_eq!(r.c.current(), 3);
}

#[test]
fn single_track_next_and_previous_stay() {
    let mut r = rig(tracks(1));
    r.c.play_next();
    assert_eq!(r.c.current(), 0);
    r.c.play_previous();
    assert_eq!(r.c.current(), 0);
    assert_eq!(r.log.borrow().created, vec![0]);
}

#[test]
fn empty_library_is_inert() {
    let mut r = rig(Vec::new());
    r.c.toggle_play();
    r.c.play_next();
    r.c.play_previous();
    r.c.seek(0.5);
    r.c.handle_event(UiEvent::Key {
        key: Key::Space,
        text_focus: false,
    });
    assert_eq!(r.c.state(), TransportState::Idle);
    assert_eq!(r.c.cached_handles(), 0);
}

#[test]
fn reselecting_reuses_the_handle() {
    let mut r = rig(tracks(3));
    r.c.select_track(1);
    r.c.select_track(1);
    r.c.toggle_play();
    r.c.toggle_play();
    assert_eq!(r.log.borrow().created, vec![1]);
    assert_eq!(r.c.cached_handles(), 1);
}

#[test]
fn seek_half_of_two_hundred_seconds() {
    let mut r = rig(tracks(1));
    r.c.toggle_play();
    r.c.seek(0.5);

    assert_eq!(r.c.handle(0).unwrap().position, 100.0);
    assert_eq!(r.c.session().position, 100.0);
    let ui = r.c.ui();
    assert_eq!(ui.style_of(Element::Progress, style::WIDTH), Some("50%"));
    assert_eq!(ui.style_of(Element::MiniProgressFill, style::WIDTH), Some("50%"));
    assert_eq!(ui.text_of(Element::CurrentTime), "1:40");
    assert_eq!(ui.text_of(Element::MiniCurrent), "1:40");
    assert_eq!(r.c.state(), TransportState::Playing);
}

#[test]
fn seek_clamps_and_keeps_pause() {
    let mut r = rig(tracks(1));
    r.c.toggle_play();
    r.c.toggle_play();
    r.c.seek(1.7);
    assert_eq!(r.c.handle(0).unwrap().position, 200.0);
    assert_eq!(r.c.state(), TransportState::Paused);
}

#[test]
fn seek_needs_handle_with_duration() {
    let mut r = rig(vec![track(0, "Unknown length", None, None)]);
    r.c.seek(0.5);
    assert_eq!(r.c.cached_handles(), 0);

    r.c.toggle_play();
    r.c.seek(0.5);
    assert_eq!(r.c.handle(0).unwrap().position, 0.0);
}

#[test]
fn progress_click_maps_column_to_fraction() {
    let mut r = rig(tracks(1));
    r.c.toggle_play();
    r.c.handle_event(UiEvent::ProgressClick { x: 35.0 });
    assert_eq!(r.c.handle(0).unwrap().position, 50.0);
}

#[test]
fn time_update_mirrors_progress_to_both_players() {
    let mut r = rig(tracks(2));
    r.c.toggle_play();
    r.c.poll_media();

    // Advance the fake handle and announce it.
    {
        let handle = r.c.cache.get_mut(0).unwrap();
        handle.position = 50.0;
        handle.events.push_back(MediaEventKind::TimeUpdate);
    }
    r.c.poll_media();

    let ui = r.c.ui();
    assert_eq!(ui.style_of(Element::Progress, style::WIDTH), Some("25%"));
    assert_eq!(ui.style_of(Element::MiniProgressFill, style::WIDTH), Some("25%"));
    assert_eq!(ui.text_of(Element::CurrentTime), "0:50");
    assert_eq!(ui.text_of(Element::MiniTotal), "3:20");
}

#[test]
fn stale_events_from_previous_track_are_ignored() {
    let mut r = rig(tracks(3));
    r.c.select_track(0);
    r.c.select_track(1);

    {
        let old = r.c.cache.get_mut(0).unwrap();
        old.position = 150.0;
        old.events.push_back(MediaEventKind::TimeUpdate);
        old.events.push_back(MediaEventKind::Ended);
    }
    r.c.poll_media();

    assert_eq!(r.c.current(), 1);
    assert_eq!(r.c.ui().text_of(Element::CurrentTime), "0:00");
}

#[test]
fn ended_on_current_advances_once() {
    let mut r = rig(tracks(3));
    r.c.select_track(1);
    r.c.on_media_event(MediaEvent {
        index: 1,
        kind: MediaEventKind::Ended,
    });
    assert_eq!(r.c.current(), 2);
    assert_eq!(r.c.state(), TransportState::Playing);
}

#[test]
fn loaded_metadata_writes_duration_labels() {
    let mut r = rig(vec![
        track(0, "A", None, None),
        track(1, "B", None, None),
    ]);
    r.c.on_media_event(MediaEvent {
        index: 1,
        kind: MediaEventKind::LoadedMetadata { duration: 61.9 },
    });
    assert_eq!(r.c.ui().text_of(Element::TrackDuration(1)), "1:01");
    assert_eq!(r.c.ui().text_of(Element::TotalTime), "--:--");

    r.c.on_media_event(MediaEvent {
        index: 0,
        kind: MediaEventKind::LoadedMetadata { duration: 30.0 },
    });
    assert_eq!(r.c.ui().text_of(Element::TotalTime), "0:30");
    assert_eq!(r.c.labels(0).unwrap().duration, Some(30.0));
}

#[test]
fn late_metadata_for_other_track_only_updates_its_row() {
    let mut r = rig(tracks(3));
    r.c.select_track(2);
    r.c.select_track(0);

    r.c.apply_metadata(
        2,
        TrackMetadata {
            title: Some("Elegy for Strings".into()),
            album: Some("Requiem".into()),
            ..TrackMetadata::default()
        },
    );

    let ui = r.c.ui();
    assert_eq!(ui.text_of(Element::TrackTitle(2)), "Elegy for Strings");
    assert_eq!(ui.text_of(Element::TrackAlbum(2)), "Requiem");
    assert_eq!(ui.text_of(Element::NowPlayingTitle), "Piece 1");
    assert_eq!(ui.text_of(Element::MiniTitle), "Piece 1");
    assert_eq!(ui.text_of(Element::NowPlayingAlbum), "");
    assert_eq!(r.c.current(), 0);
    assert_eq!(r.c.state(), TransportState::Playing);
}

#[test]
fn metadata_for_current_refreshes_now_playing() {
    let mut r = rig(tracks(2));
    r.c.apply_metadata(
        0,
        TrackMetadata {
            title: Some("Nocturne".into()),
            album: Some("Night Pieces".into()),
            artwork: Some(Artwork::File("/site/art.webp".into())),
            ..TrackMetadata::default()
        },
    );

    let ui = r.c.ui();
    assert_eq!(ui.text_of(Element::NowPlayingTitle), "Nocturne");
    assert_eq!(ui.text_of(Element::NowPlayingAlbum), "Night Pieces");
    assert_eq!(marquee::clean(ui.text_of(Element::MiniTitle)), "Nocturne");
    // Artwork waits for the first interaction.
    assert_eq!(ui.node(Element::NowPlayingArtwork).artwork, None);
    assert_eq!(r.c.state(), TransportState::Idle);

    r.c.toggle_play();
    let art = Some(Artwork::File("/site/art.webp".into()));
    assert_eq!(r.c.ui().node(Element::NowPlayingArtwork).artwork, art);
    assert_eq!(r.c.ui().node(Element::MiniArtwork).artwork, art);
    assert!(r.c.ui().has_class(Element::MiniArtwork, class::VISIBLE));
}

#[test]
fn metadata_after_interaction_shows_artwork_immediately() {
    let mut r = rig(tracks(2));
    r.c.toggle_play();
    r.c.apply_metadata(
        0,
        TrackMetadata {
            artwork: Some(Artwork::Embedded {
                mime: "image/png".into(),
                data: vec![0; 10],
            }),
            ..TrackMetadata::default()
        },
    );
    assert!(r.c.ui().has_class(Element::NowPlayingArtwork, class::VISIBLE));
    assert_eq!(r.c.ui().text_of(Element::NowPlayingTitle), "Piece 1");
}

#[test]
fn enriched_duration_reaches_handles_created_later() {
    let mut r = rig(tracks(3));
    r.c.apply_metadata(
        2,
        TrackMetadata {
            duration: Some(95.0),
            ..TrackMetadata::default()
        },
    );
    assert_eq!(r.c.cached_handles(), 0);

    r.c.select_track(2);
    assert_eq!(r.c.handle(2).unwrap().duration, Some(95.0));
    assert_eq!(r.c.ui().text_of(Element::TotalTime), "1:35");
}

#[test]
fn metadata_failure_keeps_fallback_labels() {
    let mut r = rig(tracks(1));
    let err = LibraryError::Tags {
        path: "/music/01 Piece 1.mp3".into(),
        message: "no tags".into(),
    };
    r.c.metadata_failed(0, &err);
    assert_eq!(r.c.ui().text_of(Element::TrackTitle(0)), "Piece 1");
}

#[test]
fn neighbors_preload_after_delay_without_playing() {
    let mut r = rig(tracks(4));
    r.c.select_track(0);
    r.c.tick(Instant::now());
    assert_eq!(r.log.borrow().created, vec![0]);

    r.c.tick(later());
    let mut created = r.log.borrow().created.clone();
    created.sort_unstable();
    assert_eq!(created, vec![0, 1, 3]);
    assert_eq!(r.c.handle(1).unwrap().preload, Preload::Auto);
    assert_eq!(r.c.handle(3).unwrap().preload, Preload::Auto);
    assert!(!r.c.handle(1).unwrap().playing);
    assert_eq!(r.log.borrow().plays, vec![0]);

    // Fires once.
    r.c.tick(later());
    assert_eq!(r.log.borrow().created.len(), 3);
}

#[test]
fn preloaded_neighbor_is_reused_when_selected() {
    let mut r = rig(tracks(3));
    r.c.toggle_play();
    r.c.tick(later());
    r.c.play_next();
    let created = r.log.borrow().created.clone();
    assert_eq!(created.iter().filter(|&&i| i == 1).count(), 1);
    assert!(r.c.handle(1).unwrap().playing);
}

#[test]
fn preload_can_be_disabled() {
    let mut settings = Settings::default();
    settings.player.preload_neighbors = false;
    let mut r = rig_with(tracks(3), FakePage::new(3), &settings);
    r.c.toggle_play();
    r.c.tick(later());
    assert_eq!(r.log.borrow().created, vec![0]);
}

#[test]
fn preload_waits_for_interaction() {
    let mut r = rig(tracks(3));
    r.c.preload_neighbors(0);
    assert_eq!(r.c.cached_handles(), 0);
}

#[test]
fn failed_play_schedules_no_preload() {
    let mut r = rig(tracks(3));
    r.failing.borrow_mut().insert(0);
    r.c.toggle_play();
    r.c.tick(later());
    assert_eq!(r.log.borrow().created, vec![0]);
}

const LONG: &str = "A Very Long Title That Cannot Possibly Fit";

#[test]
fn hover_scrolls_overflowing_title_and_leave_restores() {
    let mut r = rig(vec![track(0, LONG, None, None), track(1, "Short", None, None)]);

    r.c.handle_event(UiEvent::HoverEnter(0));
    let ui = r.c.ui();
    assert!(ui.has_class(Element::TrackTitle(0), class::SCROLLING));
    assert!(ui.has_class(Element::TrackTitleWrapper(0), class::SCROLL_ACTIVE));
    assert_eq!(ui.text_of(Element::TrackTitle(0)), marquee::duplicate(LONG));
    // 42 chars at 8/s.
    assert_eq!(
        ui.style_of(Element::TrackTitle(0), style::SCROLL_DURATION),
        Some("5.25s")
    );

    // Entering twice does not duplicate again.
    r.c.handle_event(UiEvent::HoverEnter(0));
    assert_eq!(r.c.ui().text_of(Element::TrackTitle(0)), marquee::duplicate(LONG));

    r.c.handle_event(UiEvent::HoverLeave(0));
    let ui = r.c.ui();
    assert!(!ui.has_class(Element::TrackTitle(0), class::SCROLLING));
    assert!(!ui.has_class(Element::TrackTitleWrapper(0), class::SCROLL_ACTIVE));
    assert_eq!(ui.text_of(Element::TrackTitle(0)), LONG);

    r.c.handle_event(UiEvent::HoverEnter(1));
    assert!(!r.c.ui().has_class(Element::TrackTitle(1), class::SCROLLING));
}

#[test]
fn leave_restores_title_ending_in_nbsp() {
    let title = format!("{LONG}\u{a0}");
    let mut r = rig(vec![track(0, &title, None, None)]);

    r.c.handle_event(UiEvent::HoverEnter(0));
    assert_eq!(r.c.ui().text_of(Element::TrackTitle(0)), marquee::duplicate(&title));

    r.c.handle_event(UiEvent::HoverLeave(0));
    assert_eq!(r.c.ui().text_of(Element::TrackTitle(0)), title);
}

#[test]
fn short_title_scrolls_against_album_share() {
    // 17 chars fit the 20-wide column but not 80% of it.
    let mut r = rig(vec![track(0, "Seventeen chars!!", Some("Op. 9"), None)]);
    r.c.handle_event(UiEvent::HoverEnter(0));
    let ui = r.c.ui();
    assert!(ui.has_class(Element::TrackTitle(0), class::SCROLLING));
    assert_eq!(
        ui.style_of(Element::TrackTitle(0), style::SCROLL_DURATION),
        Some("5s")
    );
    // Album (5 chars) overflows its 4-wide wrapper.
    assert!(ui.has_class(Element::TrackAlbum(0), class::SCROLLING));
    assert_eq!(marquee::clean(ui.text_of(Element::TrackAlbum(0))), "Op. 9");
}

#[test]
fn playing_row_keeps_scrolling_after_leave_until_paused() {
    let mut r = rig(vec![track(0, LONG, None, None)]);
    r.c.toggle_play();
    assert!(r.c.ui().has_class(Element::TrackTitle(0), class::SCROLLING));

    r.c.handle_event(UiEvent::HoverEnter(0));
    r.c.handle_event(UiEvent::HoverLeave(0));
    assert!(r.c.ui().has_class(Element::TrackTitle(0), class::SCROLLING));

    r.c.toggle_play();
    assert!(!r.c.ui().has_class(Element::TrackTitle(0), class::SCROLLING));
    assert_eq!(r.c.ui().text_of(Element::TrackTitle(0)), LONG);
}

#[test]
fn switching_tracks_stops_previous_marquee() {
    let mut r = rig(vec![track(0, LONG, None, None), track(1, "B", None, None)]);
    r.c.toggle_play();
    r.c.play_next();
    assert!(!r.c.ui().has_class(Element::TrackTitle(0), class::SCROLLING));
    assert_eq!(r.c.ui().text_of(Element::TrackTitle(0)), LONG);
    assert_eq!(r.c.ui().text_of(Element::NowPlayingTitle), "B");
}

#[test]
fn now_playing_gets_clean_text_from_scrolling_row() {
    let mut r = rig(vec![track(0, "A", None, None), track(1, LONG, None, None)]);
    r.c.handle_event(UiEvent::HoverEnter(1));
    r.c.select_track(1);
    assert_eq!(r.c.ui().text_of(Element::NowPlayingTitle), LONG);
}

#[test]
fn metadata_on_scrolling_row_restarts_marquee_with_new_text() {
    let mut r = rig(vec![track(0, LONG, None, None)]);
    r.c.handle_event(UiEvent::HoverEnter(0));
    r.c.apply_metadata(
        0,
        TrackMetadata {
            title: Some("Another Title Far Too Wide For The Column".into()),
            ..TrackMetadata::default()
        },
    );
    let text = r.c.ui().text_of(Element::TrackTitle(0)).to_string();
    assert_eq!(
        text,
        marquee::duplicate("Another Title Far Too Wide For The Column")
    );
}

#[test]
fn miniplayer_marquee_is_idempotent() {
    let mut r = rig(vec![track(0, LONG, Some("Suite"), None)]);
    r.c.select_track(0);
    let ui = r.c.ui();
    assert!(ui.has_class(Element::MiniTextWrapper, class::SCROLLING));
    assert_eq!(ui.text_of(Element::MiniTitle), marquee::duplicate(LONG));
    assert_eq!(ui.text_of(Element::MiniAlbum), marquee::duplicate("Suite"));

    r.c.handle_event(UiEvent::Resize);
    r.c.handle_event(UiEvent::Resize);
    assert_eq!(r.c.ui().text_of(Element::MiniTitle), marquee::duplicate(LONG));
}

#[test]
fn miniplayer_without_overflow_stays_still() {
    let mut r = rig(tracks(1));
    r.c.select_track(0);
    assert!(!r.c.ui().has_class(Element::MiniTextWrapper, class::SCROLLING));
    assert_eq!(r.c.ui().text_of(Element::MiniTitle), "Piece 1");
}

#[test]
fn miniplayer_follows_playback_and_scroll() {
    let mut r = rig(tracks(2));
    r.c.toggle_play();
    assert!(!r.c.miniplayer_visible());

    // Scrolled past the top.
    r.c.ui_mut().place_controls(-10.0);
    r.c.handle_event(UiEvent::Scroll);
    assert!(r.c.miniplayer_visible());

    r.c.toggle_play();
    assert!(!r.c.miniplayer_visible());

    r.c.toggle_play();
    assert!(r.c.miniplayer_visible());

    // Below the viewport minus the nav offset.
    r.c.ui_mut().place_controls(38.0);
    r.c.handle_event(UiEvent::Scroll);
    assert!(r.c.miniplayer_visible());

    r.c.ui_mut().place_controls(30.0);
    r.c.handle_event(UiEvent::Resize);
    assert!(!r.c.miniplayer_visible());
}

#[test]
fn miniplayer_buttons_drive_transport() {
    let mut r = rig(tracks(3));
    r.c.handle_event(UiEvent::Click(Element::MiniPlayButton));
    assert_eq!(r.c.state(), TransportState::Playing);
    r.c.handle_event(UiEvent::Click(Element::MiniNextButton));
    assert_eq!(r.c.current(), 1);
    r.c.handle_event(UiEvent::Click(Element::MiniPrevButton));
    r.c.handle_event(UiEvent::Click(Element::MiniPrevButton));
    assert_eq!(r.c.current(), 2);
}

#[test]
fn clicks_and_keys_map_to_transport() {
    let mut r = rig(tracks(3));
    r.c.handle_event(UiEvent::Click(Element::TrackRow(2)));
    assert_eq!(r.c.current(), 2);
    r.c.handle_event(UiEvent::Click(Element::NextButton));
    assert_eq!(r.c.current(), 0);
    r.c.handle_event(UiEvent::Click(Element::PrevButton));
    assert_eq!(r.c.current(), 2);

    let key = |key| UiEvent::Key {
        key,
        text_focus: false,
    };
    r.c.handle_event(key(Key::Right));
    assert_eq!(r.c.current(), 0);
    r.c.handle_event(key(Key::Left));
    assert_eq!(r.c.current(), 2);
    r.c.handle_event(key(Key::Space));
    assert_eq!(r.c.state(), TransportState::Paused);
    r.c.handle_event(UiEvent::Click(Element::PlayButton));
    assert_eq!(r.c.state(), TransportState::Playing);
}

#[test]
fn keys_are_ignored_with_text_focus() {
    let mut r = rig(tracks(3));
    for key in [Key::Space, Key::Left, Key::Right] {
        r.c.handle_event(UiEvent::Key {
            key,
            text_focus: true,
        });
    }
    assert_eq!(r.c.current(), 0);
    assert_eq!(r.c.state(), TransportState::Idle);
}

#[test]
fn track_list_toggle_flips_text_and_classes() {
    let mut r = rig(tracks(8));
    r.c.handle_event(UiEvent::Click(Element::TrackListToggle));
    let ui = r.c.ui();
    assert!(ui.has_class(Element::TrackList, class::EXPANDED));
    assert!(ui.has_class(Element::TrackListToggle, class::EXPANDED));
    assert_eq!(ui.text_of(Element::TrackListToggle), "Show Less");

    r.c.toggle_track_list();
    assert!(!r.c.ui().has_class(Element::TrackList, class::EXPANDED));
    assert_eq!(r.c.ui().text_of(Element::TrackListToggle), "Show More");
}

#[test]
fn missing_miniplayer_disables_only_the_miniplayer() {
    let mut page = FakePage::new(2);
    page.nodes.remove(&Element::PlayerControls);
    let mut r = rig_with(tracks(2), page, &Settings::default());

    assert!(!r.c.features().miniplayer);
    assert!(r.c.features().transport);
    r.c.ui_mut().place_controls(-50.0);
    r.c.toggle_play();
    r.c.handle_event(UiEvent::Scroll);
    assert_eq!(r.c.state(), TransportState::Playing);
    assert!(!r.c.miniplayer_visible());
    r.c.handle_event(UiEvent::Click(Element::MiniNextButton));
    assert_eq!(r.c.current(), 0);
}

#[test]
fn missing_play_button_disables_transport_surface_only() {
    let mut page = FakePage::new(2);
    page.nodes.remove(&Element::PlayButton);
    let mut r = rig_with(tracks(2), page, &Settings::default());

    assert!(!r.c.features().transport);
    r.c.handle_event(UiEvent::Key {
        key: Key::Space,
        text_focus: false,
    });
    r.c.handle_event(UiEvent::Click(Element::TrackRow(1)));
    assert_eq!(r.c.state(), TransportState::Idle);

    r.c.handle_event(UiEvent::Click(Element::TrackListToggle));
    assert_eq!(r.c.ui().text_of(Element::TrackListToggle), "Show Less");
    r.c.handle_event(UiEvent::Click(Element::MiniPlayButton));
    assert_eq!(r.c.state(), TransportState::Playing);
}

#[test]
fn missing_row_elements_do_not_break_others() {
    let mut page = FakePage::new(2);
    page.nodes.remove(&Element::TrackInfo(0));
    page.nodes.remove(&Element::TrackAlbum(1));
    let mut r = rig_with(
        vec![track(0, LONG, None, None), track(1, LONG, Some("Suite"), None)],
        page,
        &Settings::default(),
    );
    r.c.handle_event(UiEvent::HoverEnter(0));
    assert!(!r.c.ui().has_class(Element::TrackTitle(0), class::SCROLLING));
    r.c.handle_event(UiEvent::HoverEnter(1));
    assert!(r.c.ui().has_class(Element::TrackTitle(1), class::SCROLLING));
}

#[test]
fn media_error_is_not_fatal() {
    let mut r = rig(tracks(2));
    r.c.toggle_play();
    r.c.on_media_event(MediaEvent {
        index: 0,
        kind: MediaEventKind::Error("decoder gave up".into()),
    });
    assert_eq!(r.c.state(), TransportState::Playing);
}

proptest! {
    #[test]
    fn selection_lands_on_index(n in 1usize..12, picks in prop::collection::vec(0usize..12, 1..6)) {
        let mut r = rig(tracks(n));
        for i in picks {
            let i = i % n;
            r.c.select_track(i);
            prop_assert_eq!(r.c.current(), i);
            prop_assert_ne!(r.c.state(), TransportState::Idle);
        }
        prop_assert!(r.c.cached_handles() <= n);
    }

    #[test]
    fn next_then_previous_round_trips(n in 1usize..20, start in 0usize..20) {
        let start = start % n;
        prop_assert_eq!(previous_index(next_index(start, n), n), start);
        prop_assert_eq!(next_index(n - 1, n), 0);
        prop_assert_eq!(previous_index(0, n), n - 1);
        prop_assert!(next_index(start, n) < n);
    }
}
