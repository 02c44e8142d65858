//! Caption Track - the engine a player polls
//!
//! Ties a [`Timeline`] to a [`SequentialCursor`] and exposes the two views
//! consumers need:
//!
//! - **index-opaque** ([`CaptionTrack::advance`]): give the clock, get the
//!   active entry. Used for on-video subtitle display.
//! - **index-aware** ([`CaptionTrack::advance_indexed`]): the caller also
//!   tracks the highlighted line, may step it by hand, and hands it back
//!   on the next poll. Keeps the previous entry in the window so stepping
//!   backward is as cheap as stepping forward.
//!
//! Both views run the same lookup. The track is not synchronized: poll it
//! from one thread, and reload it only between polls.

use super::cursor::{CursorState, Direction, SequentialCursor, SyncStats};
use super::timeline::{validate_entries, Timeline};
use crate::config::TrackConfig;
use crate::index::{Entry, IndexStats};

/// Time-indexed entry list with a playback cursor
#[derive(Debug, Clone)]
pub struct CaptionTrack<T> {
    timeline: Timeline<T>,
    cursor: SequentialCursor,
    config: TrackConfig,
}

impl<T> Default for CaptionTrack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CaptionTrack<T> {
    /// Create an empty track with default settings
    pub fn new() -> Self {
        Self::with_config(TrackConfig::default())
    }

    pub fn with_config(config: TrackConfig) -> Self {
        Self {
            timeline: Timeline::default(),
            cursor: SequentialCursor::new(),
            config,
        }
    }

    /// Build a track holding `entries`
    pub fn from_entries(entries: Vec<Entry<T>>) -> Self {
        let mut track = Self::new();
        track.set_entries(entries);
        track
    }

    /// Replace every entry and all derived state.
    ///
    /// Entries should be sorted by start time. Unsorted input is accepted;
    /// which overlapping entry wins is then unspecified.
    pub fn set_entries(&mut self, entries: Vec<Entry<T>>) {
        if self.config.validate_entries {
            if let Err(e) = validate_entries(&entries) {
                tracing::warn!("Loaded entries are not well formed: {}", e);
            }
        }

        self.timeline = Timeline::new(entries);
        self.cursor.reset();

        tracing::debug!("Track loaded: {}", self.timeline.index().stats());
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.timeline = Timeline::default();
        self.cursor.reset();
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn entries(&self) -> &[Entry<T>] {
        self.timeline.entries()
    }

    pub fn get(&self, index: usize) -> Option<&Entry<T>> {
        self.timeline.get(index)
    }

    pub fn timeline(&self) -> &Timeline<T> {
        &self.timeline
    }

    /// Active entry at `time_ms` (index-opaque view)
    pub fn advance(&mut self, time_ms: i64) -> Option<&Entry<T>> {
        let found = self
            .cursor
            .advance(&self.timeline, time_ms, Direction::Forward)?;
        self.timeline.get(found)
    }

    /// Active entry index at `time_ms` (index-aware view).
    ///
    /// `index` is the entry the caller currently shows; when it differs from
    /// the cursor's own position the window is re-centred on it first, so
    /// manual stepping and clock polling stay consistent.
    pub fn advance_indexed(&mut self, time_ms: i64, index: Option<usize>) -> Option<usize> {
        if let Some(index) = index {
            if self.cursor.current_index() != Some(index) {
                self.cursor.anchor(&self.timeline, index);
            }
        }
        self.cursor
            .advance(&self.timeline, time_ms, Direction::Both)
    }

    /// Explicit seek: resolve `time_ms` without consulting the window.
    ///
    /// When nothing is active the window is parked at the nearest valid
    /// boundary if `time_ms` lies before the first entry or after every
    /// entry has ended; a seek into a gap between entries leaves it alone.
    pub fn seek_to(&mut self, time_ms: i64) -> Option<usize> {
        let found = self.cursor.recover(&self.timeline, time_ms);
        tracing::debug!(time_ms, index = ?found, "Seek");

        if found.is_none() {
            let entries = self.timeline.entries();
            let last = entries.len().checked_sub(1);
            if entries.first().is_some_and(|first| time_ms < first.start) {
                self.cursor
                    .set_state(CursorState::before(&self.timeline, 0));
            } else if let Some(last) = last {
                let ended = self
                    .timeline
                    .cover_end(last)
                    .is_some_and(|reach| reach < time_ms);
                if ended {
                    self.cursor.anchor(&self.timeline, last);
                }
            }
        }

        found
    }

    /// Move to the next entry, independent of the clock
    pub fn step_next(&mut self) -> Option<&Entry<T>> {
        let index = self.cursor.step_next(&self.timeline)?;
        self.timeline.get(index)
    }

    /// Move to the previous entry, independent of the clock
    pub fn step_previous(&mut self) -> Option<&Entry<T>> {
        let index = self.cursor.step_previous(&self.timeline)?;
        self.timeline.get(index)
    }

    /// Start time of the entry before the window's current one
    pub fn previous_entry_time(&self) -> Option<i64> {
        self.cursor.state().previous.map(|slot| slot.span.start)
    }

    /// Start time of the entry after the window's current one
    pub fn next_entry_time(&self) -> Option<i64> {
        self.cursor.state().next.map(|slot| slot.span.start)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.cursor.current_index()
    }

    pub fn state(&self) -> CursorState {
        self.cursor.state()
    }

    pub fn stats(&self) -> &SyncStats {
        self.cursor.stats()
    }

    pub fn index_stats(&self) -> IndexStats {
        self.timeline.index().stats()
    }
}
