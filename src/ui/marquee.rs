//! Text operations behind the marquee effect.
//!
//! Overflowing text is shown twice around `SEPARATOR` and scrolled so the
//! loop is seamless; `clean` always recovers the original.

/// Five non-breaking spaces.
pub const SEPARATOR: &str = "\u{a0}\u{a0}\u{a0}\u{a0}\u{a0}";

pub fn duplicate(text: &str) -> String {
    format!("{text}{SEPARATOR}{text}")
}

/// The original text if `text` is `t + SEPARATOR + t`, otherwise `text`.
pub fn clean(text: &str) -> &str {
    original(text).unwrap_or(text)
}

pub fn is_duplicated(text: &str) -> bool {
    original(text).is_some()
}

/// Recover `t` from `t + SEPARATOR + t` by length, so a `t` that is empty or
/// ends in U+00A0 survives the round trip.
fn original(text: &str) -> Option<&str> {
    let total = text.chars().count();
    let sep = SEPARATOR.chars().count();
    if total < sep || (total - sep) % 2 != 0 {
        return None;
    }
    let half = (total - sep) / 2;
    let split = text.char_indices().nth(half).map_or(text.len(), |(i, _)| i);
    let (head, rest) = text.split_at(split);
    let tail = rest.strip_prefix(SEPARATOR)?;
    (tail == head).then_some(head)
}

pub fn overflows(text_width: f64, container_width: f64) -> bool {
    text_width > container_width
}

/// Seconds for one full scroll cycle: proportional to the text width, never
/// below `min_secs`.
pub fn scroll_duration(text_width: f64, rate_per_second: f64, min_secs: f64) -> f64 {
    (text_width / rate_per_second).max(min_secs)
}

/// Display window into duplicated text for a phase in `[0, 1)`.
pub fn window(text: &str, phase: f64, width: usize) -> String {
    let original = clean(text);
    let cycle = original.chars().count() + SEPARATOR.chars().count();
    if cycle == 0 || width == 0 {
        return String::new();
    }
    let offset = ((phase.clamp(0.0, 1.0) * cycle as f64) as usize) % cycle;
    text.chars()
        .chain(SEPARATOR.chars())
        .chain(text.chars())
        .skip(offset)
        .take(width)
        .collect()
}
