use std::path::Path;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::fallback::{UNNUMBERED, fallback_title, track_number};
use super::model::Track;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Scan the audio directory (top level only) and order files by their
/// leading track number. Unnumbered files sort last, ties by file name.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut files: Vec<(u32, String, std::path::PathBuf)> = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file()
            || (!settings.include_hidden && is_hidden(path))
            || !is_audio_file(path, settings)
        {
            continue;
        }

        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            tracing::debug!(path = %path.display(), "skipping non-UTF-8 file name");
            continue;
        };

        let number = track_number(name).unwrap_or(UNNUMBERED);
        files.push((number, name.to_string(), path.to_path_buf()));
    }

    files.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.to_lowercase().cmp(&b.1.to_lowercase()))
    });

    files
        .into_iter()
        .map(|(_, name, path)| Track {
            title: fallback_title(&name, &settings.extensions),
            src: path,
            album: None,
            artist: None,
            duration: None,
            artwork: None,
        })
        .collect()
}
