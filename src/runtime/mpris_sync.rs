use std::path::PathBuf;

use crate::app::{PlayerController, TransportState};
use crate::audio::MediaBackend;
use crate::library::Artwork;
use crate::mpris::{MprisHandle, NowPlaying};
use crate::ui::UiPort;

/// Everything MPRIS publishes about the current track, so it only hears
/// about changes.
#[derive(Debug, Clone, PartialEq)]
pub struct MprisSnapshot {
    index: usize,
    state: TransportState,
    title: Option<String>,
    album: Option<String>,
    artist: Option<String>,
    duration: Option<f64>,
    art: Option<PathBuf>,
}

impl MprisSnapshot {
    pub fn of<B: MediaBackend, U: UiPort>(controller: &PlayerController<B, U>) -> Self {
        let index = controller.current();
        let labels = controller.labels(index);
        Self {
            index,
            state: controller.state(),
            title: labels.map(|l| l.title.clone()),
            album: labels.and_then(|l| l.album.clone()),
            artist: labels.and_then(|l| l.artist.clone()),
            duration: labels.and_then(|l| l.duration),
            art: labels.and_then(|l| match &l.artwork {
                Some(Artwork::File(path)) => Some(path.clone()),
                _ => None,
            }),
        }
    }
}

pub fn update_mpris<B: MediaBackend, U: UiPort>(
    mpris: &MprisHandle,
    controller: &PlayerController<B, U>,
) {
    let current = controller.current();
    let now = match (controller.state(), controller.tracks().get(current)) {
        (TransportState::Idle, _) | (_, None) => None,
        (_, Some(track)) => controller.labels(current).map(|labels| NowPlaying {
            index: current,
            src: &track.src,
            labels,
        }),
    };
    mpris.set_track_metadata(now);
    mpris.set_playback(controller.state());
}
