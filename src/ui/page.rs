//! Retained terminal page implementing `UiPort`.
//!
//! Every element is a node holding text, classes, styles and an artwork
//! label. Geometry is derived from the node state and the terminal size on
//! demand, so measurements always match what the next frame will draw.

use std::collections::{BTreeSet, HashMap};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::marquee;
use super::port::{Bounds, Element, Extent, UiEvent, UiPort, class};
use crate::config::UiSettings;
use crate::library::Artwork;

/// Fixed nav bar at the top of the viewport.
pub const NAV_HEIGHT: u16 = 3;
pub const HERO_HEIGHT: u16 = 7;
pub const FOOTER_HEIGHT: u16 = 4;
pub const MINI_HEIGHT: u16 = 4;
const BUTTON_WIDTH: u16 = 5;
const TIME_WIDTH: u16 = 7;
const DURATION_WIDTH: u16 = 6;
const WHEEL_STEP: i32 = 3;

#[derive(Debug, Default, Clone)]
pub struct Node {
    pub text: String,
    pub classes: BTreeSet<String>,
    pub styles: HashMap<String, String>,
    pub artwork: Option<String>,
}

impl Node {
    fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn has(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn style(&self, prop: &str) -> Option<&str> {
        self.styles.get(prop).map(String::as_str)
    }
}

/// Element geometry. Page elements use page rows (before scrolling); the
/// miniplayer uses viewport rows.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub rects: HashMap<Element, Rect>,
    pub mini: HashMap<Element, Rect>,
    pub hero: Rect,
    pub player: Rect,
    pub footer: Rect,
    pub height: u16,
}

#[derive(Debug, Clone)]
pub struct TerminalPage {
    nodes: HashMap<Element, Node>,
    track_count: usize,
    collapsed_rows: usize,
    title_share: f64,
    pub title: String,
    pub tagline: String,
    pub footer_text: String,
    width: u16,
    height: u16,
    scroll: u16,
    hovered: Option<usize>,
}

impl TerminalPage {
    pub fn new(track_count: usize, ui: &UiSettings, title_share: f64, size: (u16, u16)) -> Self {
        use Element::*;

        let mut nodes = HashMap::new();
        for el in [
            PlayButton,
            PrevButton,
            NextButton,
            ProgressBar,
            Progress,
            NowPlayingArtwork,
            PlayerControls,
            TrackList,
            Miniplayer,
            MiniInfo,
            MiniTextWrapper,
            MiniTitle,
            MiniAlbum,
            MiniArtwork,
            MiniPlayButton,
            MiniPrevButton,
            MiniNextButton,
            MiniProgressFill,
            NowPlayingAlbum,
        ] {
            nodes.insert(el, Node::default());
        }
        nodes.insert(NowPlayingTitle, Node::with_text("Select a track"));
        nodes.insert(CurrentTime, Node::with_text("0:00"));
        nodes.insert(TotalTime, Node::with_text("0:00"));
        nodes.insert(MiniCurrent, Node::with_text("0:00"));
        nodes.insert(MiniTotal, Node::with_text("0:00"));
        nodes.insert(TrackListToggle, Node::with_text("Show More"));

        for i in 0..track_count {
            nodes.insert(TrackRow(i), Node::default());
            nodes.insert(TrackInfo(i), Node::default());
            nodes.insert(TrackTitleWrapper(i), Node::default());
            nodes.insert(TrackTitle(i), Node::with_text("Loading..."));
            nodes.insert(TrackAlbumWrapper(i), Node::default());
            nodes.insert(TrackAlbum(i), Node::default());
            nodes.insert(TrackDuration(i), Node::with_text("--:--"));
        }

        Self {
            nodes,
            track_count,
            collapsed_rows: ui.collapsed_rows,
            title_share,
            title: ui.title.clone(),
            tagline: ui.tagline.clone(),
            footer_text: ui.footer_text.clone(),
            width: size.0,
            height: size.1,
            scroll: 0,
            hovered: None,
        }
    }

    pub fn node(&self, el: Element) -> Option<&Node> {
        self.nodes.get(&el)
    }

    /// Drop an element, as if the markup never had it.
    pub fn remove(&mut self, el: Element) {
        self.nodes.remove(&el);
    }

    pub fn track_count(&self) -> usize {
        self.track_count
    }

    /// Clean titles of every track row, in row order.
    pub fn track_titles(&self) -> Vec<String> {
        (0..self.track_count)
            .map(|i| {
                self.node(Element::TrackTitle(i))
                    .map(|n| marquee::clean(&n.text).to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Scroll the page by `delta` rows; returns whether the offset changed.
    pub fn scroll_by(&mut self, delta: i32) -> bool {
        let next = (self.scroll as i32 + delta).clamp(0, self.max_scroll() as i32) as u16;
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }

    fn max_scroll(&self) -> u16 {
        let visible = self.height.saturating_sub(NAV_HEIGHT);
        self.layout().height.saturating_sub(visible)
    }

    fn text_width(&self, el: Element) -> u16 {
        self.nodes
            .get(&el)
            .map(|n| n.text.chars().count() as u16)
            .unwrap_or(0)
    }

    fn visible_rows(&self) -> usize {
        let expanded = self
            .nodes
            .get(&Element::TrackList)
            .is_some_and(|n| n.has(class::EXPANDED));
        if expanded {
            self.track_count
        } else {
            self.track_count.min(self.collapsed_rows)
        }
    }

    pub fn layout(&self) -> PageLayout {
        use Element::*;

        let mut rects = HashMap::new();
        let w = self.width;
        let inner_x = 2;
        let inner_w = w.saturating_sub(4);

        let hero = Rect::new(0, 0, w, HERO_HEIGHT);
        let player_top = HERO_HEIGHT;
        let mut y = player_top + 1;

        for el in [NowPlayingTitle, NowPlayingAlbum, NowPlayingArtwork] {
            rects.insert(el, Rect::new(inner_x, y, inner_w, 1));
            y += 1;
        }
        y += 1;

        let controls_top = y;
        for (n, el) in [PrevButton, PlayButton, NextButton].into_iter().enumerate() {
            let x = inner_x + n as u16 * (BUTTON_WIDTH + 1);
            rects.insert(el, Rect::new(x, y, BUTTON_WIDTH, 1));
        }
        y += 1;
        rects.insert(ProgressBar, Rect::new(inner_x, y, inner_w, 1));
        rects.insert(Progress, Rect::new(inner_x, y, inner_w, 1));
        y += 1;
        rects.insert(CurrentTime, Rect::new(inner_x, y, TIME_WIDTH, 1));
        rects.insert(
            TotalTime,
            Rect::new(
                inner_x + inner_w.saturating_sub(TIME_WIDTH),
                y,
                TIME_WIDTH.min(inner_w),
                1,
            ),
        );
        y += 1;
        rects.insert(
            PlayerControls,
            Rect::new(inner_x, controls_top, inner_w, y - controls_top),
        );
        y += 1;

        let list_top = y;
        let info_x = inner_x + 5;
        let info_w = inner_w.saturating_sub(5 + 1 + DURATION_WIDTH);
        for i in 0..self.visible_rows() {
            rects.insert(TrackRow(i), Rect::new(inner_x, y, inner_w, 1));
            rects.insert(TrackInfo(i), Rect::new(info_x, y, info_w, 1));

            let has_album = self.text_width(TrackAlbum(i)) > 0;
            let title_w = if has_album {
                (info_w as f64 * self.title_share).floor() as u16
            } else {
                info_w
            };
            rects.insert(TrackTitleWrapper(i), Rect::new(info_x, y, title_w, 1));
            rects.insert(TrackTitle(i), Rect::new(info_x, y, title_w, 1));
            if has_album {
                let album_x = info_x + title_w + 1;
                let album_w = info_w.saturating_sub(title_w + 1);
                rects.insert(TrackAlbumWrapper(i), Rect::new(album_x, y, album_w, 1));
                rects.insert(TrackAlbum(i), Rect::new(album_x, y, album_w, 1));
            }
            rects.insert(
                TrackDuration(i),
                Rect::new(
                    inner_x + inner_w.saturating_sub(DURATION_WIDTH),
                    y,
                    DURATION_WIDTH.min(inner_w),
                    1,
                ),
            );
            y += 1;
        }
        rects.insert(TrackList, Rect::new(inner_x, list_top, inner_w, y - list_top));
        if self.track_count > self.collapsed_rows {
            rects.insert(TrackListToggle, Rect::new(inner_x, y, inner_w, 1));
            y += 1;
        }
        y += 1;

        let player = Rect::new(0, player_top, w, y - player_top);
        let footer = Rect::new(0, y, w, FOOTER_HEIGHT);
        let height = y + FOOTER_HEIGHT;

        PageLayout {
            rects,
            mini: self.mini_layout(),
            hero,
            player,
            footer,
            height,
        }
    }

    fn mini_layout(&self) -> HashMap<Element, Rect> {
        use Element::*;

        let mut rects = HashMap::new();
        let w = self.width;
        let top = self.height.saturating_sub(MINI_HEIGHT);
        let row = top + 1;

        rects.insert(Miniplayer, Rect::new(0, top, w, MINI_HEIGHT.min(self.height)));
        for (n, el) in [MiniPrevButton, MiniPlayButton, MiniNextButton]
            .into_iter()
            .enumerate()
        {
            let x = 1 + n as u16 * (BUTTON_WIDTH + 1);
            rects.insert(el, Rect::new(x, row, BUTTON_WIDTH, 1));
        }
        let buttons_w = 3 * (BUTTON_WIDTH + 1);
        rects.insert(MiniArtwork, Rect::new(1, row + 1, buttons_w, 1));

        let times_x = w.saturating_sub(1 + 2 * TIME_WIDTH + 1);
        rects.insert(MiniCurrent, Rect::new(times_x, row, TIME_WIDTH, 1));
        rects.insert(
            MiniTotal,
            Rect::new(times_x + TIME_WIDTH + 1, row, TIME_WIDTH, 1),
        );

        let info_x = 1 + buttons_w + 1;
        let info_w = times_x.saturating_sub(info_x + 1);
        rects.insert(MiniInfo, Rect::new(info_x, row, info_w, 2));
        rects.insert(MiniTextWrapper, Rect::new(info_x, row, info_w, 2));
        rects.insert(MiniTitle, Rect::new(info_x, row, info_w, 1));
        rects.insert(MiniAlbum, Rect::new(info_x, row + 1, info_w, 1));
        rects.insert(
            MiniProgressFill,
            Rect::new(0, top + MINI_HEIGHT.saturating_sub(1), w, 1),
        );
        rects
    }

    fn is_mini(el: Element) -> bool {
        use Element::*;
        matches!(
            el,
            Miniplayer
                | MiniInfo
                | MiniTextWrapper
                | MiniTitle
                | MiniAlbum
                | MiniArtwork
                | MiniPlayButton
                | MiniPrevButton
                | MiniNextButton
                | MiniCurrent
                | MiniTotal
                | MiniProgressFill
        )
    }

    fn rect(&self, el: Element) -> Option<Rect> {
        if !self.nodes.contains_key(&el) {
            return None;
        }
        let layout = self.layout();
        if Self::is_mini(el) {
            layout.mini.get(&el).copied()
        } else {
            layout.rects.get(&el).copied()
        }
    }

    fn mini_visible(&self) -> bool {
        self.nodes
            .get(&Element::Miniplayer)
            .is_some_and(|n| n.has(class::VISIBLE))
    }

    /// Element under viewport cell (`col`, `row`).
    pub fn hit(&self, col: u16, row: u16) -> Option<Element> {
        use Element::*;

        let layout = self.layout();
        let contains = |r: &Rect, y: u16| {
            col >= r.x && col < r.x + r.width && y >= r.y && y < r.y + r.height
        };

        if self.mini_visible() && row >= self.height.saturating_sub(MINI_HEIGHT) {
            return [MiniPrevButton, MiniPlayButton, MiniNextButton]
                .into_iter()
                .filter(|el| self.nodes.contains_key(el))
                .find(|el| layout.mini.get(el).is_some_and(|r| contains(r, row)));
        }
        if row < NAV_HEIGHT {
            return None;
        }

        let page_row = row - NAV_HEIGHT + self.scroll;
        let fixed = [PrevButton, PlayButton, NextButton, ProgressBar, TrackListToggle];
        let rows = (0..self.track_count).map(TrackRow);
        fixed
            .into_iter()
            .chain(rows)
            .filter(|el| self.nodes.contains_key(el))
            .find(|el| layout.rects.get(el).is_some_and(|r| contains(r, page_row)))
    }

    fn hovered_row(&self, col: u16, row: u16) -> Option<usize> {
        match self.hit(col, row) {
            Some(Element::TrackRow(i)) => Some(i),
            _ => None,
        }
    }

    /// Translate a mouse event into the events the controller consumes.
    pub fn translate_mouse(&mut self, ev: MouseEvent) -> Vec<UiEvent> {
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => match self.hit(ev.column, ev.row) {
                Some(Element::ProgressBar) => vec![UiEvent::ProgressClick {
                    x: ev.column as f64,
                }],
                Some(el) => vec![UiEvent::Click(el)],
                None => Vec::new(),
            },
            MouseEventKind::Moved => {
                let row = self.hovered_row(ev.column, ev.row);
                self.set_hover(row)
            }
            MouseEventKind::ScrollDown => self.scroll_events(WHEEL_STEP),
            MouseEventKind::ScrollUp => self.scroll_events(-WHEEL_STEP),
            _ => Vec::new(),
        }
    }

    /// Scroll and report the viewport change, if any.
    pub fn scroll_events(&mut self, delta: i32) -> Vec<UiEvent> {
        if self.scroll_by(delta) {
            vec![UiEvent::Scroll]
        } else {
            Vec::new()
        }
    }

    fn set_hover(&mut self, row: Option<usize>) -> Vec<UiEvent> {
        if row == self.hovered {
            return Vec::new();
        }
        let mut events = Vec::new();
        if let Some(old) = self.hovered {
            events.push(UiEvent::HoverLeave(old));
        }
        if let Some(new) = row {
            events.push(UiEvent::HoverEnter(new));
        }
        self.hovered = row;
        events
    }
}

impl UiPort for TerminalPage {
    fn exists(&self, el: Element) -> bool {
        self.nodes.contains_key(&el)
    }

    fn text(&self, el: Element) -> Option<String> {
        self.nodes.get(&el).map(|n| n.text.clone())
    }

    fn set_text(&mut self, el: Element, text: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.text = text.to_string();
        }
    }

    fn has_class(&self, el: Element, class: &str) -> bool {
        self.nodes.get(&el).is_some_and(|n| n.has(class))
    }

    fn set_class(&mut self, el: Element, class: &str, on: bool) {
        if let Some(node) = self.nodes.get_mut(&el) {
            if on {
                node.classes.insert(class.to_string());
            } else {
                node.classes.remove(class);
            }
        }
    }

    fn set_style(&mut self, el: Element, prop: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.styles.insert(prop.to_string(), value.to_string());
        }
    }

    fn set_artwork(&mut self, el: Element, artwork: Option<&Artwork>) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.artwork = artwork.map(Artwork::describe);
        }
    }

    fn measure(&self, el: Element) -> Option<Extent> {
        let rect = self.rect(el)?;
        // Containers report the widest child; text nodes their own text.
        let scroll_width = match el {
            Element::MiniTextWrapper | Element::MiniInfo => self
                .text_width(Element::MiniTitle)
                .max(self.text_width(Element::MiniAlbum)),
            Element::TrackTitleWrapper(i) => self.text_width(Element::TrackTitle(i)),
            Element::TrackAlbumWrapper(i) => self.text_width(Element::TrackAlbum(i)),
            _ => self.text_width(el),
        };
        Some(Extent {
            scroll_width: scroll_width as f64,
            client_width: rect.width as f64,
        })
    }

    fn bounds(&self, el: Element) -> Option<Bounds> {
        let rect = self.rect(el)?;
        let top = if Self::is_mini(el) {
            rect.y as f64
        } else {
            NAV_HEIGHT as f64 + rect.y as f64 - self.scroll as f64
        };
        Some(Bounds {
            left: rect.x as f64,
            top,
            width: rect.width as f64,
            height: rect.height as f64,
        })
    }

    fn viewport_height(&self) -> f64 {
        self.height as f64
    }
}
