//! Playback queue
//!
//! Ordered tracks plus a cursor. Single-track playback leaves the queue
//! empty; only `play_track_list` fills it.

use seedtune_core::Track;
use std::sync::Arc;

/// Ordered list of tracks with a cursor
///
/// The cursor is `Some(i)` with `i < len` whenever the queue is non-empty
/// and `None` when it is empty.
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    tracks: Arc<Vec<Track>>,
    cursor: Option<usize>,
}

impl PlaybackQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue contents and put the cursor on the first track
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.cursor = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = Arc::new(tracks);
    }

    /// Remove all tracks
    pub fn clear(&mut self) {
        self.tracks = Arc::new(Vec::new());
        self.cursor = None;
    }

    /// Shared view of the tracks (cheap to clone into snapshots)
    pub fn tracks(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.tracks)
    }

    /// Current cursor
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of queued tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at the cursor
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Index after the cursor, if it exists
    pub fn next_index(&self) -> Option<usize> {
        self.cursor
            .map(|i| i + 1)
            .filter(|&next| next < self.tracks.len())
    }

    /// Index before the cursor, if it exists
    pub fn previous_index(&self) -> Option<usize> {
        self.cursor.and_then(|i| i.checked_sub(1))
    }

    /// Move the cursor to `index`
    ///
    /// Returns `false` and leaves the cursor unchanged if `index` is out of
    /// bounds.
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter()
            .map(|id| Track::new(*id, format!("Track {id}"), 30_000))
            .collect()
    }

    #[test]
    fn new_queue_is_empty() {
        let queue = PlaybackQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
        assert!(queue.current().is_none());
        assert_eq!(queue.next_index(), None);
        assert_eq!(queue.previous_index(), None);
    }

    #[test]
    fn replace_puts_cursor_on_first_track() {
        let mut queue = PlaybackQueue::new();
        queue.replace(tracks(&["a", "b", "c"]));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.cursor(), Some(0));
        assert_eq!(queue.current().unwrap().id, "a");
    }

    #[test]
    fn replace_with_empty_resets_cursor() {
        let mut queue = PlaybackQueue::new();
        queue.replace(tracks(&["a"]));
        queue.replace(Vec::new());

        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
    }

    #[test]
    fn next_and_previous_respect_bounds() {
        let mut queue = PlaybackQueue::new();
        queue.replace(tracks(&["a", "b"]));

        assert_eq!(queue.previous_index(), None);
        assert_eq!(queue.next_index(), Some(1));

        assert!(queue.set_cursor(1));
        assert_eq!(queue.next_index(), None);
        assert_eq!(queue.previous_index(), Some(0));
    }

    #[test]
    fn set_cursor_out_of_bounds_is_rejected() {
        let mut queue = PlaybackQueue::new();
        queue.replace(tracks(&["a", "b"]));

        assert!(!queue.set_cursor(2));
        assert_eq!(queue.cursor(), Some(0));
    }

    #[test]
    fn clear_drops_tracks_and_cursor() {
        let mut queue = PlaybackQueue::new();
        queue.replace(tracks(&["a", "b"]));
        let shared = queue.tracks();

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
        // Snapshots taken earlier keep their view
        assert_eq!(shared.len(), 2);
    }
}
