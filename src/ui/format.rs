/// Placeholder for an unknown time.
pub const UNKNOWN_TIME: &str = "--:--";

/// Format seconds as `M:SS` (minutes unbounded). Non-finite or negative
/// input renders as `--:--`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return UNKNOWN_TIME.to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// One progress reading, computed once and written to every surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Fill percentage in `[0, 100]`.
    pub percent: f64,
    pub current: String,
    pub total: String,
}

impl Progress {
    pub fn new(position: f64, duration: f64) -> Self {
        let known = duration.is_finite() && duration > 0.0;
        let position = if position.is_finite() { position.max(0.0) } else { 0.0 };

        let percent = if known {
            (position / duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            percent,
            current: format_time(position),
            total: if known {
                format_time(duration)
            } else {
                UNKNOWN_TIME.to_string()
            },
        }
    }

    /// CSS-like width value for the fill element.
    pub fn width(&self) -> String {
        format!("{}%", self.percent)
    }
}
