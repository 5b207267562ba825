use std::collections::HashMap;

use super::backend::MediaHandle;
use super::types::MediaEvent;

/// Lazily created media handles keyed by track index.
///
/// At most one handle exists per index; entries live as long as the cache.
pub struct MediaCache<H> {
    handles: HashMap<usize, H>,
}

impl<H> Default for MediaCache<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H: MediaHandle> MediaCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.handles.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<&H> {
        self.handles.get(&index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut H> {
        self.handles.get_mut(&index)
    }

    /// Return the cached handle for `index`, calling `create` only on a miss.
    pub fn get_or_create(&mut self, index: usize, create: impl FnOnce() -> H) -> &mut H {
        self.handles.entry(index).or_insert_with(create)
    }

    /// Drain queued events from every handle, tagged with their index.
    ///
    /// Events are grouped by ascending index so dispatch order is stable.
    pub fn drain_events(&mut self) -> Vec<MediaEvent> {
        let mut indices: Vec<usize> = self.handles.keys().copied().collect();
        indices.sort_unstable();

        let mut events = Vec::new();
        for index in indices {
            if let Some(handle) = self.handles.get_mut(&index) {
                while let Some(kind) = handle.poll_event() {
                    events.push(MediaEvent { index, kind });
                }
            }
        }
        events
    }
}
