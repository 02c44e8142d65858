//! Bucket Index - second-granular map from start time to entries
//!
//! Every entry is registered exactly once, under the second containing its
//! start. A lookup therefore touches a single bucket, and entries spanning
//! several seconds are only reachable through their start bucket. The
//! widest such span is recorded at build time so the seek path can bound
//! how far back it has to look.
//!
//! # Performance
//! - Build: O(n), single pass
//! - Lookup: O(k) where k = entries starting in the queried second

use super::{bucket_of, Entry, IndexStats, Slot};
use std::collections::HashMap;

/// Second → slots of the entries starting in that second
#[derive(Debug, Clone, Default)]
pub struct BucketIndex {
    /// bucket → slots in list order
    buckets: HashMap<i64, Vec<Slot>>,
    /// Widest entry, in buckets past its start bucket
    max_span_secs: i64,
    /// Number of indexed entries
    len: usize,
}

impl BucketIndex {
    /// Index an ordered entry list
    pub fn build<T>(entries: &[Entry<T>]) -> Self {
        let mut buckets: HashMap<i64, Vec<Slot>> = HashMap::new();
        let mut max_span_secs = 0;

        for (index, entry) in entries.iter().enumerate() {
            let span = entry.span();
            buckets
                .entry(bucket_of(span.start))
                .or_default()
                .push(Slot::new(span, index));
            max_span_secs = max_span_secs.max(span.bucket_reach());
        }

        Self {
            buckets,
            max_span_secs,
            len: entries.len(),
        }
    }

    /// Find the active slot among the entries that start in `time_ms`'s second.
    ///
    /// Adjacent buckets are never consulted: an entry that started in an
    /// earlier second is the caller's business.
    pub fn lookup(&self, time_ms: i64) -> Option<Slot> {
        Self::best_match(self.candidates(bucket_of(time_ms)), time_ms)
    }

    /// Winning slot in `slots` containing `time_ms`
    pub(crate) fn best_match(slots: &[Slot], time_ms: i64) -> Option<Slot> {
        slots
            .iter()
            .filter(|slot| slot.contains(time_ms))
            .fold(None, |best: Option<Slot>, slot| match best {
                Some(current) if !slot.outranks(&current) => Some(current),
                _ => Some(*slot),
            })
    }

    /// Slots of the entries whose start falls in `second`
    pub fn candidates(&self, second: i64) -> &[Slot] {
        self.buckets
            .get(&second)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Widest entry, in buckets past its start bucket
    pub fn max_span_secs(&self) -> i64 {
        self.max_span_secs
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entries: self.len,
            buckets: self.buckets.len(),
            largest_bucket: self.buckets.values().map(Vec::len).max().unwrap_or(0),
            max_span_secs: self.max_span_secs,
        }
    }
}
