//! Ratatui rendering of the retained page.
//!
//! Nothing here mutates the page: the frame is a pure function of the node
//! state, the scroll offset and the elapsed time (for marquee phases).

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use super::marquee;
use super::page::{NAV_HEIGHT, Node, TerminalPage};
use super::port::{Element, class, style};
use super::prompt::{JumpPrompt, fuzzy_match_positions};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("space".to_string(), "play/pause".to_string());
    map.insert("←/→".to_string(), "prev/next".to_string());
    map.insert("/".to_string(), "jump to track".to_string());
    map.insert("t".to_string(), "show more/less".to_string());
    map.insert("j/k".to_string(), "scroll".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    let order = ["space", "←/→", "/", "t", "j/k", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Parse a `--scroll-duration` value such as `"12.5s"`.
fn scroll_secs(node: &Node) -> Option<f64> {
    node.style(style::SCROLL_DURATION)?
        .trim_end_matches('s')
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Parse a `width` value such as `"42.5%"` into a ratio.
fn width_ratio(node: &Node) -> f64 {
    node.style(style::WIDTH)
        .and_then(|w| w.trim_end_matches('%').parse::<f64>().ok())
        .map(|p| (p / 100.0).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// Visible text for a node, scrolled when `scroll` carries a duration.
fn visible_text(node: &Node, scroll: Option<f64>, elapsed: Duration, width: u16) -> String {
    match scroll {
        Some(secs) if marquee::is_duplicated(&node.text) => {
            let phase = (elapsed.as_secs_f64() % secs) / secs;
            marquee::window(&node.text, phase, width as usize)
        }
        _ => marquee::clean(&node.text)
            .chars()
            .take(width as usize)
            .collect(),
    }
}

struct Screen<'a> {
    page: &'a TerminalPage,
    viewport: Rect,
}

impl Screen<'_> {
    /// Map a page rect onto the screen, clipped to the area below the nav.
    fn map(&self, r: Rect) -> Option<Rect> {
        let top = r.y as i32 + NAV_HEIGHT as i32 - self.page.scroll() as i32;
        let bottom = top + r.height as i32;
        let clip_top = top.max(self.viewport.y as i32);
        let clip_bottom = bottom.min(self.viewport.bottom() as i32);
        if clip_bottom <= clip_top {
            return None;
        }
        Some(Rect::new(
            r.x,
            clip_top as u16,
            r.width,
            (clip_bottom - clip_top) as u16,
        ))
    }
}

/// Render the whole page into `frame`.
pub fn draw(frame: &mut Frame, page: &TerminalPage, prompt: &JumpPrompt, elapsed: Duration) {
    let area = frame.area();
    let layout = page.layout();
    let screen = Screen {
        page,
        viewport: Rect::new(
            0,
            NAV_HEIGHT.min(area.height),
            area.width,
            area.height.saturating_sub(NAV_HEIGHT),
        ),
    };
    let rect = |el: Element| -> Option<Rect> {
        page.node(el)?;
        layout.rects.get(&el).and_then(|r| screen.map(*r))
    };

    // Hero
    if let Some(hero) = screen.map(layout.hero) {
        let text = vec![
            Line::from(""),
            Line::from(page.title.as_str().bold()),
            Line::from(page.tagline.as_str().italic()),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), hero);
    }

    // Player
    if let Some(player) = screen.map(layout.player) {
        frame.render_widget(Block::bordered().title(" music "), player);
    }

    if let (Some(r), Some(n)) = (rect(Element::NowPlayingTitle), page.node(Element::NowPlayingTitle)) {
        frame.render_widget(
            Paragraph::new(visible_text(n, None, elapsed, r.width)).bold(),
            r,
        );
    }
    if let (Some(r), Some(n)) = (rect(Element::NowPlayingAlbum), page.node(Element::NowPlayingAlbum)) {
        frame.render_widget(
            Paragraph::new(visible_text(n, None, elapsed, r.width)).dim(),
            r,
        );
    }
    if let (Some(r), Some(n)) = (rect(Element::NowPlayingArtwork), page.node(Element::NowPlayingArtwork)) {
        if let Some(art) = n.artwork.as_deref() {
            frame.render_widget(Paragraph::new(format!("♪ {art}")).dim(), r);
        }
    }

    let playing = |el: Element| page.node(el).is_some_and(|n| n.has(class::PLAYING));
    for (el, label) in [
        (Element::PrevButton, "[|<]".to_string()),
        (
            Element::PlayButton,
            if playing(Element::PlayButton) { "[||]" } else { "[ >]" }.to_string(),
        ),
        (Element::NextButton, "[>|]".to_string()),
    ] {
        if let Some(r) = rect(el) {
            frame.render_widget(Paragraph::new(label).bold(), r);
        }
    }

    if let (Some(r), Some(n)) = (rect(Element::ProgressBar), page.node(Element::Progress)) {
        frame.render_widget(
            Gauge::default()
                .ratio(width_ratio(n))
                .label("")
                .use_unicode(true),
            r,
        );
    }
    if let (Some(r), Some(n)) = (rect(Element::CurrentTime), page.node(Element::CurrentTime)) {
        frame.render_widget(Paragraph::new(n.text.as_str()), r);
    }
    if let (Some(r), Some(n)) = (rect(Element::TotalTime), page.node(Element::TotalTime)) {
        frame.render_widget(
            Paragraph::new(n.text.as_str()).alignment(Alignment::Right),
            r,
        );
    }

    // Track rows
    for i in 0..page.track_count() {
        let Some(row_rect) = rect(Element::TrackRow(i)) else {
            continue;
        };
        let active = page
            .node(Element::TrackRow(i))
            .is_some_and(|n| n.has(class::ACTIVE));
        let mut row_style = Style::default();
        if active {
            row_style = row_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        if page.hovered() == Some(i) {
            row_style = row_style.add_modifier(Modifier::UNDERLINED);
        }
        frame.render_widget(Paragraph::new("").style(row_style), row_rect);
        frame.render_widget(
            Paragraph::new(format!("{:02}", i + 1)).style(row_style),
            Rect::new(row_rect.x, row_rect.y, 4.min(row_rect.width), 1),
        );

        for el in [Element::TrackTitle(i), Element::TrackAlbum(i)] {
            let (Some(r), Some(n)) = (rect(el), page.node(el)) else {
                continue;
            };
            let scroll = if n.has(class::SCROLLING) {
                scroll_secs(n)
            } else {
                None
            };
            let mut s = row_style;
            if matches!(el, Element::TrackAlbum(_)) {
                s = s.add_modifier(Modifier::DIM);
            }
            frame.render_widget(
                Paragraph::new(visible_text(n, scroll, elapsed, r.width)).style(s),
                r,
            );
        }
        if let (Some(r), Some(n)) = (rect(Element::TrackDuration(i)), page.node(Element::TrackDuration(i))) {
            frame.render_widget(
                Paragraph::new(n.text.as_str())
                    .alignment(Alignment::Right)
                    .style(row_style),
                r,
            );
        }
    }

    if let (Some(r), Some(n)) = (rect(Element::TrackListToggle), page.node(Element::TrackListToggle)) {
        let arrow = if n.has(class::EXPANDED) { "▴" } else { "▾" };
        frame.render_widget(
            Paragraph::new(format!("{arrow} {}", n.text))
                .alignment(Alignment::Center)
                .italic(),
            r,
        );
    }

    // Footer
    if let Some(footer) = screen.map(layout.footer) {
        let footer_par = Paragraph::new(vec![
            Line::from(page.footer_text.as_str()),
            Line::from(controls_text().dim()),
        ])
        .block(Block::default().borders(Borders::ALL).title(" contact ").padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        }))
        .wrap(Wrap { trim: true });
        frame.render_widget(footer_par, footer);
    }

    // Nav, drawn over anything scrolled beneath it.
    let nav = Rect::new(0, 0, area.width, NAV_HEIGHT.min(area.height));
    frame.render_widget(Clear, nav);
    frame.render_widget(
        Paragraph::new(page.title.as_str())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" overture ")
                    .title_alignment(Alignment::Center),
            ),
        nav,
    );

    draw_miniplayer(frame, page, &layout.mini, elapsed);

    if prompt.is_open() {
        draw_prompt(frame, page, prompt, area);
    }
}

fn draw_miniplayer(
    frame: &mut Frame,
    page: &TerminalPage,
    mini: &std::collections::HashMap<Element, Rect>,
    elapsed: Duration,
) {
    let visible = page
        .node(Element::Miniplayer)
        .is_some_and(|n| n.has(class::VISIBLE));
    if !visible {
        return;
    }
    let rect = |el: Element| -> Option<Rect> {
        page.node(el)?;
        mini.get(&el).copied()
    };

    if let Some(r) = rect(Element::Miniplayer) {
        frame.render_widget(Clear, r);
        frame.render_widget(Block::default().borders(Borders::TOP), r);
    }

    let playing = page
        .node(Element::MiniPlayButton)
        .is_some_and(|n| n.has(class::PLAYING));
    for (el, label) in [
        (Element::MiniPrevButton, "[|<]"),
        (Element::MiniPlayButton, if playing { "[||]" } else { "[ >]" }),
        (Element::MiniNextButton, "[>|]"),
    ] {
        if let Some(r) = rect(el) {
            frame.render_widget(Paragraph::new(label).bold(), r);
        }
    }

    if let (Some(r), Some(n)) = (rect(Element::MiniArtwork), page.node(Element::MiniArtwork)) {
        if n.has(class::VISIBLE) {
            if let Some(art) = n.artwork.as_deref() {
                frame.render_widget(Paragraph::new(format!("♪ {art}")).dim(), r);
            }
        }
    }

    let scroll = page.node(Element::MiniTextWrapper).and_then(|w| {
        if w.has(class::SCROLLING) {
            scroll_secs(w)
        } else {
            None
        }
    });
    for el in [Element::MiniTitle, Element::MiniAlbum] {
        if let (Some(r), Some(n)) = (rect(el), page.node(el)) {
            let text = visible_text(n, scroll, elapsed, r.width);
            let par = if el == Element::MiniTitle {
                Paragraph::new(text).bold()
            } else {
                Paragraph::new(text).dim()
            };
            frame.render_widget(par, r);
        }
    }

    for el in [Element::MiniCurrent, Element::MiniTotal] {
        if let (Some(r), Some(n)) = (rect(el), page.node(el)) {
            frame.render_widget(
                Paragraph::new(n.text.as_str()).alignment(Alignment::Right),
                r,
            );
        }
    }

    if let (Some(r), Some(n)) = (rect(Element::MiniProgressFill), page.node(Element::MiniProgressFill)) {
        frame.render_widget(
            Gauge::default()
                .ratio(width_ratio(n))
                .label("")
                .use_unicode(true),
            r,
        );
    }
}

fn draw_prompt(frame: &mut Frame, page: &TerminalPage, prompt: &JumpPrompt, area: Rect) {
    let popup = centered_rect_sized(60, 12, area);
    frame.render_widget(Clear, popup);

    let titles = page.track_titles();
    let matches = prompt.matches(titles.iter().map(String::as_str));
    let selected = prompt.selection(titles.iter().map(String::as_str));

    let items: Vec<ListItem> = matches
        .iter()
        .map(|&i| {
            let title = &titles[i];
            let Some(positions) = fuzzy_match_positions(title, prompt.query()) else {
                return ListItem::new(title.as_str());
            };
            let spans: Vec<Span> = title
                .chars()
                .enumerate()
                .map(|(ci, ch)| {
                    if positions.contains(&ci) {
                        Span::from(ch.to_string()).bold().underlined()
                    } else {
                        Span::from(ch.to_string())
                    }
                })
                .collect();
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" jump: {} ", prompt.query())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(selected.and_then(|s| matches.iter().position(|&m| m == s)));
    frame.render_stateful_widget(list, popup, &mut state);
}
