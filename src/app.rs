//! Application module: the player controller and its playback session.
//!
//! `PlayerController` owns the session, the lazy media-handle cache and the
//! per-track labels, and reflects every transition into a `UiPort`.

mod controller;
mod display;
mod enrich;
mod labels;
mod session;

pub use controller::PlayerController;
pub use labels::TrackLabels;
pub use session::TransportState;

#[cfg(test)]
pub use controller::Features;
#[cfg(test)]
pub use session::{next_index, previous_index};

#[cfg(test)]
mod tests;
