use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/overture/config.toml` or `~/.config/overture/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `OVERTURE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub player: PlayerSettings,
    pub marquee: MarqueeSettings,
    pub miniplayer: MiniplayerSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Audio directory. The first CLI argument wins over this.
    pub dir: Option<PathBuf>,
    /// Manifest file name inside the audio directory.
    pub manifest_name: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Read tags in the background when no manifest is present.
    pub read_tags: bool,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            dir: None,
            manifest_name: "tracks.json".to_string(),
            extensions: vec!["mp3".into(), "wav".into()],
            read_tags: true,
            follow_links: true,
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Delay before the neighbors of a newly playing track are preloaded (milliseconds).
    pub preload_delay_ms: u64,
    /// Set to false to never preload neighbors.
    pub preload_neighbors: bool,
    /// Minimum interval between position updates from a playing handle (milliseconds).
    pub time_update_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            preload_delay_ms: 2000,
            preload_neighbors: true,
            time_update_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarqueeSettings {
    /// Scroll speed in display cells per second.
    pub rate_per_second: f64,
    /// Lower bound for one full scroll cycle (seconds).
    pub min_duration_secs: f64,
    /// Share of the track info column available to the title when an album
    /// is shown next to it.
    pub title_share_with_album: f64,
}

impl Default for MarqueeSettings {
    fn default() -> Self {
        Self {
            rate_per_second: 8.0,
            min_duration_secs: 5.0,
            title_share_with_album: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MiniplayerSettings {
    /// Rows at the bottom of the viewport that don't count as "visible"
    /// when deciding whether the main player is on screen.
    pub nav_offset: u16,
}

impl Default for MiniplayerSettings {
    fn default() -> Self {
        Self { nav_offset: 3 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Name shown in the navigation bar and hero.
    pub title: String,
    /// Line under the title in the hero.
    pub tagline: String,
    /// Text of the contact/footer section.
    pub footer_text: String,
    /// Track rows shown while the list is collapsed.
    pub collapsed_rows: usize,
    /// Input poll interval for the event loop (milliseconds).
    pub tick_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: "Alistair Robertson".to_string(),
            tagline: "Composer for film, games & concert".to_string(),
            footer_text: "For commissions and enquiries, get in touch.".to_string(),
            collapsed_rows: 6,
            tick_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/overture/overture.log`.
    pub path: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
        }
    }
}
