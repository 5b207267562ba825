//! MPRIS2 D-Bus surface so desktop media keys and `playerctl` reach the
//! controller.
//!
//! The service runs on its own thread. Method calls become `ControlCmd`s on
//! a channel drained by the event loop; the loop pushes state back through
//! `MprisHandle`, which signals property changes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::app::{TrackLabels, TransportState};
use crate::library::Artwork;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.overture";
const NOTIFY_POLL: Duration = Duration::from_millis(200);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    /// There is no stopped state on the page; treated as pause.
    Stop,
    Next,
    Prev,
}

/// The track MPRIS should describe.
#[derive(Debug, Clone, Copy)]
pub struct NowPlaying<'a> {
    pub index: usize,
    pub src: &'a Path,
    pub labels: &'a TrackLabels,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: TransportState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: TransportState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    pub fn set_track_metadata(&self, now: Option<NowPlaying<'_>>) {
        if let Ok(mut s) = self.state.lock() {
            match now {
                Some(now) => {
                    s.title = Some(now.labels.title.clone());
                    s.artist = now.labels.artist.iter().cloned().collect();
                    s.album = now.labels.album.clone();
                    s.url = Some(format!("file://{}", now.src.display()));
                    s.art_url = match &now.labels.artwork {
                        Some(Artwork::File(path)) => Some(format!("file://{}", path.display())),
                        _ => None,
                    };
                    s.length_micros = now
                        .labels
                        .duration
                        .filter(|d| d.is_finite() && *d > 0.0)
                        .map(|d| (d * 1_000_000.0).round() as i64);
                    s.track_id = ObjectPath::try_from(format!("{OBJECT_PATH}/track/{}", now.index))
                        .ok()
                        .map(OwnedObjectPath::from);
                }
                None => {
                    let playback = s.playback;
                    *s = SharedState {
                        playback,
                        ..SharedState::default()
                    };
                }
            }
        }
        let _ = self.notify.send(());
    }
}

fn playback_status_str(playback: TransportState) -> &'static str {
    match playback {
        TransportState::Idle => "Stopped",
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
    }
}

fn owned<'a>(value: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(value.into()).ok()
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "overture"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec!["audio/mpeg".to_string(), "audio/wav".to_string()]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        playback_status_str(s.playback)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(id) = s.track_id.clone() {
            if let Some(v) = owned(id.into_inner()) {
                map.insert("mpris:trackid".to_string(), v);
            }
        }
        if let Some(v) = owned(s.title.clone().unwrap_or_default()) {
            map.insert("xesam:title".to_string(), v);
        }
        if !s.artist.is_empty() {
            if let Some(v) = owned(s.artist.clone()) {
                map.insert("xesam:artist".to_string(), v);
            }
        }
        let strings = [
            ("xesam:album", &s.album),
            ("xesam:url", &s.url),
            ("mpris:artUrl", &s.art_url),
        ];
        for (key, value) in strings {
            if let Some(v) = value.clone().and_then(owned) {
                map.insert(key.to_string(), v);
            }
        }
        if let Some(v) = s.length_micros.and_then(owned) {
            map.insert("mpris:length".to_string(), v);
        }
        map
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;
    debug!(name = BUS_NAME, "MPRIS service registered");

    let iface_ref = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;

    loop {
        Timer::after(NOTIFY_POLL).await;

        let mut changed = false;
        loop {
            match notify.try_recv() {
                Ok(()) => changed = true,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if changed {
            let iface = iface_ref.get().await;
            let emitter = iface_ref.signal_emitter();
            iface.playback_status_changed(emitter).await?;
            iface.metadata_changed(emitter).await?;
        }
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state_for_thread, notify_rx)) {
            warn!(error = %e, "MPRIS unavailable");
        }
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}
