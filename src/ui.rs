//! User interface: the port the controller drives, the pure helpers behind
//! it, and the terminal page that implements it.
//!
//! The terminal page is a retained node map rendered with `ratatui`.

mod format;
pub mod marquee;
mod page;
mod port;
mod prompt;
mod render;
mod viewport;

pub use format::{Progress, UNKNOWN_TIME, format_time};
pub use page::TerminalPage;
pub use port::{Element, Key, UiEvent, UiPort, class, style};
pub use prompt::JumpPrompt;
pub use render::draw;
pub use viewport::is_visible;

#[cfg(test)]
pub use port::{Bounds, Extent};
#[cfg(test)]
pub use prompt::fuzzy_match_positions;
