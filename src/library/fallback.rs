use std::path::Path;

/// Sort key for files without a leading track number.
pub const UNNUMBERED: u32 = 999;

/// Leading track number of a file name, e.g. `"01 Breath.mp3"` -> `Some(1)`.
pub fn track_number(file_name: &str) -> Option<u32> {
    let digits: &str = {
        let end = file_name
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(file_name.len());
        &file_name[..end]
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Display title derived from a file name: leading digits and whitespace are
/// stripped, then a known audio extension.
///
/// Falls back to the file stem when nothing is left, so the UI never shows
/// an empty title.
pub fn fallback_title(file_name: &str, extensions: &[String]) -> String {
    let stripped = file_name
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start();

    let title = match stripped.rsplit_once('.') {
        Some((stem, ext))
            if extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => stripped,
    };

    if title.trim().is_empty() {
        Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name)
            .to_string()
    } else {
        title.to_string()
    }
}
