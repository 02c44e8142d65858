//! Sequential Cursor - O(1) lookups for a forward-moving clock
//!
//! Holds a three-entry window (previous / current / next) over the
//! timeline. While playback moves forward the answer is almost always the
//! current entry or the one right after it, so most polls never touch the
//! bucket index:
//!
//! ```text
//!   previous      current        next
//! [ 0..=1000 ]  [ 1000..=2000 ]  [ 5000..=6000 ]
//!                     ↑ t=1500: hit
//!                                      ↑ t=5500: shift forward
//!                          ↑ t=3000: gap, nothing active
//! ```
//!
//! When a nested line ends inside a longer one, the enclosing entry sitting
//! in `previous` resumes in O(1) as well, in both directions.
//!
//! Anything else (seek, rewind, startup, skipping an entry) goes through
//! [`recovery::locate`](super::recovery::locate), which re-seeds the window.
//! A recovery that finds nothing leaves the window untouched so a clock
//! returning into the old range still takes the fast path.

use super::recovery;
use super::timeline::Timeline;
use crate::index::Slot;

/// Snapshot of the cursor window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    pub previous: Option<Slot>,
    pub current: Option<Slot>,
    pub next: Option<Slot>,
}

impl CursorState {
    /// Window centred on the entry at `index`
    pub fn centred<T>(timeline: &Timeline<T>, index: usize) -> Self {
        Self {
            previous: index.checked_sub(1).and_then(|i| timeline.slot(i)),
            current: timeline.slot(index),
            next: index.checked_add(1).and_then(|i| timeline.slot(i)),
        }
    }

    /// Window sitting just before the entry at `index`, nothing current
    pub fn before<T>(timeline: &Timeline<T>, index: usize) -> Self {
        Self {
            previous: index.checked_sub(1).and_then(|i| timeline.slot(i)),
            current: None,
            next: timeline.slot(index),
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.map(|slot| slot.index)
    }
}

/// Counters describing how lookups were answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Answered by the current entry
    pub hits: u64,
    /// Answered by shifting to the next entry
    pub forward_shifts: u64,
    /// Answered by shifting to the previous entry
    pub backward_shifts: u64,
    /// Proven empty from the window alone
    pub gap_hits: u64,
    /// Recoveries that found an entry
    pub recoveries: u64,
    /// Recoveries that found nothing
    pub misses: u64,
}

impl SyncStats {
    pub fn lookups(&self) -> u64 {
        self.hits
            + self.forward_shifts
            + self.backward_shifts
            + self.gap_hits
            + self.recoveries
            + self.misses
    }

    /// Share of lookups answered without touching the bucket index
    pub fn fast_path_ratio(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            return 0.0;
        }
        (total - self.recoveries - self.misses) as f64 / total as f64
    }
}

impl std::fmt::Display for SyncStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lookups={}, hits={}, forward={}, backward={}, gaps={}, recovered={}, missed={} ({:.1}% fast path)",
            self.lookups(),
            self.hits,
            self.forward_shifts,
            self.backward_shifts,
            self.gap_hits,
            self.recoveries,
            self.misses,
            self.fast_path_ratio() * 100.0
        )
    }
}

/// Which window slots a lookup may use before falling back to recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// current and next only
    Forward,
    /// current, next and previous
    Both,
}

/// Window cache over a [`Timeline`]
///
/// The cursor does not own the timeline; callers pass the same timeline to
/// every call and [`reset`](Self::reset) the cursor when it is replaced.
#[derive(Debug, Clone, Default)]
pub struct SequentialCursor {
    state: CursorState,
    stats: SyncStats,
}

impl SequentialCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index()
    }

    /// Forget the window and the counters
    pub fn reset(&mut self) {
        self.state = CursorState::default();
        self.stats = SyncStats::default();
    }

    /// Re-centre the window on `index`; ignored when out of range
    pub fn anchor<T>(&mut self, timeline: &Timeline<T>, index: usize) {
        if index < timeline.len() {
            self.state = CursorState::centred(timeline, index);
        }
    }

    pub(crate) fn set_state(&mut self, state: CursorState) {
        self.state = state;
    }

    /// Resolve the active entry at `time_ms`
    pub fn advance<T>(
        &mut self,
        timeline: &Timeline<T>,
        time_ms: i64,
        direction: Direction,
    ) -> Option<usize> {
        if let Some(outcome) = self.fast_path(timeline, time_ms, direction) {
            return outcome;
        }
        self.recover(timeline, time_ms)
    }

    /// Run recovery directly, bypassing the window checks
    pub fn recover<T>(&mut self, timeline: &Timeline<T>, time_ms: i64) -> Option<usize> {
        match recovery::locate(timeline, time_ms) {
            Some(found) => {
                self.stats.recoveries += 1;
                self.state = CursorState::centred(timeline, found.index);
                Some(found.index)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// `Some(outcome)` when the window alone settles the lookup
    fn fast_path<T>(
        &mut self,
        timeline: &Timeline<T>,
        time_ms: i64,
        direction: Direction,
    ) -> Option<Option<usize>> {
        if let Some(current) = self.state.current {
            if timeline.wins_locally(&current, time_ms) {
                self.stats.hits += 1;
                return Some(Some(current.index));
            }
        }

        if let Some(next) = self.state.next {
            if timeline.wins_locally(&next, time_ms) {
                self.stats.forward_shifts += 1;
                self.state = CursorState {
                    previous: self.state.current.or(self.state.previous),
                    current: Some(next),
                    next: timeline.slot(next.index + 1),
                };
                return Some(Some(next.index));
            }
        }

        if self.in_gap(timeline, time_ms) {
            self.stats.gap_hits += 1;
            return Some(None);
        }

        if let Some(previous) = self.state.previous {
            let resumes = self.state.current.is_some_and(|current| {
                current.span.end < time_ms && previous.span.end > current.span.end
            });

            if (resumes || direction == Direction::Both)
                && timeline.wins_locally(&previous, time_ms)
            {
                self.stats.backward_shifts += 1;
                self.state = if resumes {
                    self.resumed(timeline, previous, time_ms)
                } else {
                    CursorState {
                        previous: previous.index.checked_sub(1).and_then(|i| timeline.slot(i)),
                        current: Some(previous),
                        next: self.state.current.or(self.state.next),
                    }
                };
                return Some(Some(previous.index));
            }
        }

        None
    }

    /// Window after returning to `enclosing` once the nested current entry
    /// has ended: the entry just left stays as `previous`, and `next` is the
    /// first entry that has not started yet.
    fn resumed<T>(&self, timeline: &Timeline<T>, enclosing: Slot, time_ms: i64) -> CursorState {
        CursorState {
            previous: self.state.current,
            current: Some(enclosing),
            next: timeline.slot(timeline.first_after(time_ms)),
        }
    }

    /// Whether `time_ms` lies after every entry before the window's next
    /// one has ended and before that next entry starts.
    fn in_gap<T>(&self, timeline: &Timeline<T>, time_ms: i64) -> bool {
        let ended_before = |index: usize| match index.checked_sub(1) {
            Some(last) => timeline.cover_end(last).is_some_and(|reach| reach < time_ms),
            None => true,
        };

        match self.state.next {
            Some(next) => ended_before(next.index) && time_ms < next.span.start,
            // Past the end of the list; only trusted once the window is placed
            None => self.state.current.is_some() && ended_before(timeline.len()),
        }
    }

    /// Move the window one entry forward; `None` at the end of the list
    pub fn step_next<T>(&mut self, timeline: &Timeline<T>) -> Option<usize> {
        let target = match (self.state.current, self.state.next) {
            (Some(current), _) => current.index.checked_add(1)?,
            (None, Some(next)) => next.index,
            (None, None) => return None,
        };

        if target >= timeline.len() {
            return None;
        }
        self.state = CursorState::centred(timeline, target);
        Some(target)
    }

    /// Move the window one entry back; `None` at the start of the list
    pub fn step_previous<T>(&mut self, timeline: &Timeline<T>) -> Option<usize> {
        let target = match (self.state.current, self.state.previous, self.state.next) {
            (Some(current), _, _) => current.index.checked_sub(1)?,
            (None, Some(previous), _) => previous.index,
            (None, None, Some(next)) => next.index.checked_sub(1)?,
            (None, None, None) => return None,
        };

        if target >= timeline.len() {
            return None;
        }
        self.state = CursorState::centred(timeline, target);
        Some(target)
    }
}
