//! The UI port: the element capability set the player controller drives.
//!
//! Elements are addressed by `Element`; a port may lack any of them, in
//! which case mutations are no-ops and queries return `None`.

use crate::library::Artwork;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    PlayButton,
    PrevButton,
    NextButton,
    /// Clickable seek area.
    ProgressBar,
    /// Fill inside the progress bar; its `width` style is a percentage.
    Progress,
    CurrentTime,
    TotalTime,
    NowPlayingTitle,
    NowPlayingAlbum,
    NowPlayingArtwork,
    /// The primary transport region whose visibility drives the miniplayer.
    PlayerControls,
    TrackList,
    TrackListToggle,
    TrackRow(usize),
    /// Middle column of a row holding title and album.
    TrackInfo(usize),
    TrackTitleWrapper(usize),
    TrackTitle(usize),
    TrackAlbumWrapper(usize),
    TrackAlbum(usize),
    TrackDuration(usize),
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
}

pub mod class {
    pub const ACTIVE: &str = "active";
    pub const PLAYING: &str = "playing";
    pub const VISIBLE: &str = "visible";
    pub const EXPANDED: &str = "expanded";
    /// Text element whose content is duplicated and scrolling.
    pub const SCROLLING: &str = "scrolling";
    /// Wrapper clipping a scrolling text element.
    pub const SCROLL_ACTIVE: &str = "scroll-active";
}

pub mod style {
    pub const WIDTH: &str = "width";
    pub const SCROLL_DURATION: &str = "--scroll-duration";
}

/// Rendered text width against the width available to it, in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub scroll_width: f64,
    pub client_width: f64,
}

/// Bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Left,
    Right,
}

/// Input reaching the controller from whatever hosts the port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    Click(Element),
    /// Click on the progress bar at viewport x.
    ProgressClick { x: f64 },
    HoverEnter(usize),
    HoverLeave(usize),
    Key { key: Key, text_focus: bool },
    Scroll,
    Resize,
}

pub trait UiPort {
    fn exists(&self, el: Element) -> bool;

    fn text(&self, el: Element) -> Option<String>;

    fn set_text(&mut self, el: Element, text: &str);

    fn has_class(&self, el: Element, class: &str) -> bool;

    fn set_class(&mut self, el: Element, class: &str, on: bool);

    fn set_style(&mut self, el: Element, prop: &str, value: &str);

    /// Show `artwork`, or clear the image when `None`.
    fn set_artwork(&mut self, el: Element, artwork: Option<&Artwork>);

    fn measure(&self, el: Element) -> Option<Extent>;

    fn bounds(&self, el: Element) -> Option<Bounds>;

    fn viewport_height(&self) -> f64;
}
