//! Cueline Index Structures
//!
//! Core data model shared by the cursor and the danmaku aggregator:
//!
//! - **Entry**: a time-ranged payload (subtitle line, word occurrence)
//! - **Span**: a closed `[start, end]` millisecond interval
//! - **Slot**: an entry's span plus its position in the ordered list
//! - **BucketIndex**: second → slots whose entry starts in that second
//!
//! # Architecture
//!
//! ```text
//! entries: [A 0..=1000] [B 1000..=2000] [C 5000..=6000]
//!        ↓ bucket = floor(start / 1000)
//! buckets: 0 → [A]   1 → [B]   5 → [C]
//!        ↓
//! lookup(5500): scan bucket 5 only → C
//! ```

mod bucket_index;

pub use bucket_index::BucketIndex;

use serde::{Deserialize, Serialize};

/// Milliseconds per bucket
pub const BUCKET_MS: i64 = 1000;

/// Bucket (whole second) holding a millisecond timestamp.
///
/// Floors toward negative infinity so that negative times do not share
/// bucket 0 with the first second of media.
pub fn bucket_of(time_ms: i64) -> i64 {
    time_ms.div_euclid(BUCKET_MS)
}

/// Closed millisecond interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Both ends inclusive
    pub fn contains(&self, time_ms: i64) -> bool {
        self.start <= time_ms && time_ms <= self.end
    }

    /// Length in milliseconds, zero for inverted spans
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start).max(0)
    }

    /// Number of buckets past the start bucket that this span reaches into
    pub fn bucket_reach(&self) -> i64 {
        (bucket_of(self.end) - bucket_of(self.start)).max(0)
    }
}

/// A time-ranged entry carrying a caller-defined payload
///
/// Entries are immutable once handed to the engine; a reload replaces the
/// whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<T> {
    /// Start time in milliseconds from media start
    pub start: i64,
    /// End time in milliseconds, inclusive
    pub end: i64,
    /// Subtitle text, word reference, ...
    pub payload: T,
}

impl<T> Entry<T> {
    pub fn new(start: i64, end: i64, payload: T) -> Self {
        Self {
            start,
            end,
            payload,
        }
    }

    /// Build an entry from subtitle timecodes (`HH:MM:SS,mmm`).
    ///
    /// Malformed timecodes resolve to `0`, see [`crate::timecode`].
    pub fn from_timecodes(start: &str, end: &str, payload: T) -> Self {
        Self::new(
            crate::timecode::parse_to_millis(start),
            crate::timecode::parse_to_millis(end),
            payload,
        )
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn contains(&self, time_ms: i64) -> bool {
        self.span().contains(time_ms)
    }
}

/// Position of an entry in the ordered list, with its span cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub span: Span,
    pub index: usize,
}

impl Slot {
    pub fn new(span: Span, index: usize) -> Self {
        Self { span, index }
    }

    pub fn contains(&self, time_ms: i64) -> bool {
        self.span.contains(time_ms)
    }

    /// Winner rule when both slots contain the query time: the most recently
    /// started entry wins, equal starts fall back to list order.
    ///
    /// List order alone only decides between equal starts. A short line
    /// nested inside a longer one wins while it shows, even though the longer
    /// line comes first in the list: `[1000..=3000 X, 1500..=2500 Y]` resolves
    /// to Y at 1800.
    pub fn outranks(&self, other: &Slot) -> bool {
        self.span.start > other.span.start
            || (self.span.start == other.span.start && self.index < other.index)
    }
}

/// Statistics about a built index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of indexed entries
    pub entries: usize,
    /// Number of non-empty buckets
    pub buckets: usize,
    /// Most entries starting in a single second
    pub largest_bucket: usize,
    /// Widest entry, in buckets past its start bucket
    pub max_span_secs: i64,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "entries={}, buckets={}, largest_bucket={}, max_span_secs={}",
            self.entries, self.buckets, self.largest_bucket, self.max_span_secs
        )
    }
}
