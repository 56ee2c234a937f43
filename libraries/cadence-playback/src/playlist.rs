//! Playlist view
//!
//! The track list itself belongs to the engine; this is the shell's copy of it
//! plus the row cursor and the exclusive `current` mark.

use cadence_core::{TrackId, TrackRecord};

#[derive(Debug, Clone, Default)]
pub struct PlaylistView {
    tracks: Vec<TrackRecord>,
    cursor: Option<usize>,
}

impl PlaylistView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows, placing the cursor on the current row if any
    pub fn replace(&mut self, tracks: Vec<TrackRecord>) {
        self.cursor = if tracks.is_empty() {
            None
        } else {
            Some(tracks.iter().position(|track| track.current).unwrap_or(0))
        };
        self.tracks = tracks;
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Find a row by track id
    pub fn find(&self, id: TrackId) -> Option<&TrackRecord> {
        self.tracks.iter().find(|track| track.id == id)
    }

    /// Row marked current, if any
    pub fn current(&self) -> Option<&TrackRecord> {
        self.tracks.iter().find(|track| track.current)
    }

    /// Mark `id` as the only current row
    ///
    /// Returns false and clears every mark when no row has that id.
    pub fn mark_current(&mut self, id: TrackId) -> bool {
        let mut found = false;
        for track in &mut self.tracks {
            track.current = track.id == id;
            found |= track.current;
        }
        found
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Row under the cursor
    pub fn cursor_track(&self) -> Option<&TrackRecord> {
        self.cursor.and_then(|index| self.tracks.get(index))
    }

    pub fn cursor_down(&mut self) {
        if let Some(index) = self.cursor {
            self.cursor = Some((index + 1).min(self.tracks.len().saturating_sub(1)));
        }
    }

    pub fn cursor_up(&mut self) {
        if let Some(index) = self.cursor {
            self.cursor = Some(index.saturating_sub(1));
        }
    }

    pub fn cursor_first(&mut self) {
        if !self.tracks.is_empty() {
            self.cursor = Some(0);
        }
    }

    pub fn cursor_last(&mut self) {
        if !self.tracks.is_empty() {
            self.cursor = Some(self.tracks.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(count: u64) -> Vec<TrackRecord> {
        (1..=count)
            .map(|id| {
                TrackRecord::new(
                    TrackId::new(id),
                    format!("Track {id}"),
                    "Artist",
                    "Album",
                    180.0,
                    format!("/music/{id}.flac"),
                )
            })
            .collect()
    }

    #[test]
    fn replace_places_cursor_on_current_row() {
        let mut rows = tracks(3);
        rows[2].current = true;

        let mut view = PlaylistView::new();
        view.replace(rows);
        assert_eq!(view.cursor(), Some(2));

        view.replace(tracks(2));
        assert_eq!(view.cursor(), Some(0));

        view.replace(Vec::new());
        assert_eq!(view.cursor(), None);
        assert!(view.cursor_track().is_none());
    }

    #[test]
    fn current_mark_is_exclusive() {
        let mut view = PlaylistView::new();
        view.replace(tracks(3));

        assert!(view.mark_current(TrackId::new(2)));
        assert!(view.mark_current(TrackId::new(3)));
        let marked: Vec<_> = view.tracks().iter().filter(|t| t.current).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(view.current().map(|t| t.id), Some(TrackId::new(3)));
    }

    #[test]
    fn unknown_id_clears_marks() {
        let mut view = PlaylistView::new();
        view.replace(tracks(2));
        view.mark_current(TrackId::new(1));

        assert!(!view.mark_current(TrackId::new(99)));
        assert!(view.current().is_none());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut view = PlaylistView::new();
        view.replace(tracks(3));

        view.cursor_up();
        assert_eq!(view.cursor(), Some(0));
        view.cursor_down();
        view.cursor_down();
        view.cursor_down();
        assert_eq!(view.cursor(), Some(2));
        view.cursor_first();
        assert_eq!(view.cursor(), Some(0));
        view.cursor_last();
        assert_eq!(view.cursor_track().map(|t| t.id), Some(TrackId::new(3)));
    }
}
