/// Transport state of the single playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// No handle has been asked to play yet.
    #[default]
    Idle,
    Paused,
    Playing,
}

#[derive(Debug, Clone)]
pub struct PlaybackSession {
    /// Index of the current track, always `< track_count` when tracks exist.
    pub current: usize,
    pub state: TransportState,
    /// Set by the first play or selection; never cleared.
    pub interacted: bool,
    /// Seconds, mirrored from the current handle.
    pub position: f64,
    /// Seconds; NaN until the current handle knows it.
    pub duration: f64,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            current: 0,
            state: TransportState::Idle,
            interacted: false,
            position: 0.0,
            duration: f64::NAN,
        }
    }
}

impl PlaybackSession {
    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// Mark the first user interaction. Returns true only the first time.
    pub fn interact(&mut self) -> bool {
        let first = !self.interacted;
        self.interacted = true;
        first
    }
}

/// Index after `current`, wrapping to 0.
pub fn next_index(current: usize, len: usize) -> usize {
    if current + 1 < len { current + 1 } else { 0 }
}

/// Index before `current`, wrapping to the last index.
pub fn previous_index(current: usize, len: usize) -> usize {
    if current > 0 {
        current - 1
    } else {
        len.saturating_sub(1)
    }
}
