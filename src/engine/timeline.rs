//! Timeline - the immutable, indexed side of the engine
//!
//! Owns the ordered entries together with everything derived from them at
//! load time:
//!
//! - the [`BucketIndex`] used by seek recovery
//! - `cover_end[i]`, the latest end among entries `0..=i`, which lets the
//!   cursor prove in O(1) that a query time falls in a gap
//! - a sparse table of entry ends, answering "is any entry in `i..j` still
//!   showing" in O(1) so an enclosing entry keeps winning after a nested
//!   one has ended
//!
//! A timeline is built once per loaded file and dropped as a whole on
//! reload.

use super::error::{SyncError, SyncResult};
use crate::index::{BucketIndex, Entry, Slot};

/// Ordered entries plus their derived lookup structures
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    entries: Vec<Entry<T>>,
    index: BucketIndex,
    /// Running maximum of `end` over the entry prefix
    cover_end: Vec<i64>,
    /// `latest_end[k][i]` is the latest end among entries `i..i + 2^k`
    latest_end: Vec<Vec<i64>>,
}

impl<T> Timeline<T> {
    /// Build a timeline from entries sorted by start time
    pub fn new(entries: Vec<Entry<T>>) -> Self {
        let index = BucketIndex::build(&entries);
        let cover_end = entries
            .iter()
            .scan(i64::MIN, |reach, entry| {
                *reach = (*reach).max(entry.end);
                Some(*reach)
            })
            .collect();
        let latest_end = build_range_max(entries.iter().map(|entry| entry.end).collect());

        Self {
            entries,
            index,
            cover_end,
            latest_end,
        }
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry<T>> {
        self.entries.get(index)
    }

    /// Slot for the entry at `index`
    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.entries
            .get(index)
            .map(|entry| Slot::new(entry.span(), index))
    }

    pub fn index(&self) -> &BucketIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest end among entries `0..=index`
    pub(crate) fn cover_end(&self, index: usize) -> Option<i64> {
        self.cover_end.get(index).copied()
    }

    /// Latest end among entries `from..to`; `None` for an empty range
    fn latest_end_in(&self, from: usize, to: usize) -> Option<i64> {
        let width = to.checked_sub(from).filter(|&w| w > 0)?;
        let level = (usize::BITS - 1 - width.leading_zeros()) as usize;
        let ends = self.latest_end.get(level)?;
        let left = ends.get(from)?;
        let right = ends.get(to - (1 << level))?;
        Some((*left).max(*right))
    }

    /// Index of the first entry starting after `time_ms`
    pub(crate) fn first_after(&self, time_ms: i64) -> usize {
        self.entries.partition_point(|entry| entry.start <= time_ms)
    }

    /// Whether `slot` is the winning entry at `time_ms`, judged without a
    /// bucket scan.
    ///
    /// Holds when the slot contains the time, no earlier entry with the same
    /// start is still showing, and no later-starting entry that has begun is
    /// still showing. For sorted input this is exact; the common case (next
    /// entry not started yet) costs O(1), otherwise one binary search.
    pub(crate) fn wins_locally(&self, slot: &Slot, time_ms: i64) -> bool {
        if !slot.contains(time_ms) {
            return false;
        }

        let start = slot.span.start;
        let before = self.entries.get(..slot.index).unwrap_or(&[]);
        let shadowed = before
            .iter()
            .rev()
            .take_while(|entry| entry.start == start)
            .any(|entry| entry.contains(time_ms));
        if shadowed {
            return false;
        }

        let later = self.entries.get(slot.index + 1..).unwrap_or(&[]);
        let siblings = later.iter().take_while(|entry| entry.start == start).count();
        let first_later = slot.index + 1 + siblings;

        let begun = match later.get(siblings) {
            Some(entry) if entry.start <= time_ms => later
                .get(siblings..)
                .unwrap_or(&[])
                .partition_point(|entry| entry.start <= time_ms),
            _ => return true,
        };

        // Later starts outrank the slot, but only while they are showing
        self.latest_end_in(first_later, first_later + begun)
            .map_or(true, |end| end < time_ms)
    }

    /// Reference resolution by linear scan over every entry.
    ///
    /// Same winner rule as the indexed path; O(n).
    pub fn scan_active(&self, time_ms: i64) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.contains(time_ms))
            .map(|(index, entry)| Slot::new(entry.span(), index))
            .fold(None, |best: Option<Slot>, slot| match best {
                Some(current) if !slot.outranks(&current) => Some(current),
                _ => Some(slot),
            })
            .map(|slot| slot.index)
    }
}

/// Sparse table of range maxima, level `k` covering windows of `2^k` values
fn build_range_max(values: Vec<i64>) -> Vec<Vec<i64>> {
    let mut levels = vec![values];
    let mut half = 1;

    while let Some(previous) = levels.last() {
        if previous.len() <= half {
            break;
        }
        let next: Vec<i64> = previous
            .iter()
            .zip(previous.iter().skip(half))
            .map(|(left, right)| (*left).max(*right))
            .collect();
        levels.push(next);
        half *= 2;
    }

    levels
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Check that entries are well formed and sorted by start time.
///
/// The engine tolerates violations (tie-breaks become unspecified); this is
/// for callers that want to surface them.
pub fn validate_entries<T>(entries: &[Entry<T>]) -> SyncResult<()> {
    let mut previous_start: Option<i64> = None;

    for (index, entry) in entries.iter().enumerate() {
        if entry.end < entry.start {
            return Err(SyncError::InvalidEntry {
                index,
                start: entry.start,
                end: entry.end,
            });
        }

        if let Some(previous_start) = previous_start {
            if entry.start < previous_start {
                return Err(SyncError::Unsorted {
                    index,
                    start: entry.start,
                    previous_start,
                });
            }
        }
        previous_start = Some(entry.start);
    }

    Ok(())
}
