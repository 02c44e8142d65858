//! Seek Recovery - the cache-miss path of the cursor
//!
//! Runs whenever a query time falls outside the cursor window: after a seek,
//! a rewind, on startup, or when playback skips past the next entry.
//!
//! # Algorithm
//!
//! ```text
//! t = 3000, max_span_secs = 4
//!
//! bucket 3 → no entry contains t
//! bucket 2 → no entry contains t
//! bucket 1 → [1000..=5000] contains t → winner
//! ```
//!
//! Buckets are scanned from the query's own second downwards, at most
//! `max_span_secs` seconds back: no entry can start earlier than that and
//! still be showing. Because bucket order follows start order, the first
//! bucket holding a match also holds the most recently started match.
//!
//! When the look-back would visit more seconds than there are entries (one
//! pathological hours-long entry), a linear scan over the entries is cheaper
//! and is used instead.

use super::timeline::Timeline;
use crate::index::{bucket_of, BucketIndex, Slot};

/// Locate the active entry at `time_ms` without using any cached window
pub fn locate<T>(timeline: &Timeline<T>, time_ms: i64) -> Option<Slot> {
    let index = timeline.index();
    if index.is_empty() {
        return None;
    }

    let reach = index.max_span_secs();
    if reach >= index.len() as i64 {
        tracing::trace!(time_ms, reach, "Look-back wider than index, scanning linearly");
        return timeline
            .scan_active(time_ms)
            .and_then(|found| timeline.slot(found));
    }

    let bucket = bucket_of(time_ms);
    for offset in 0..=reach {
        let Some(second) = bucket.checked_sub(offset) else {
            break;
        };

        if let Some(found) = BucketIndex::best_match(index.candidates(second), time_ms) {
            tracing::trace!(time_ms, second, index = found.index, "Recovered entry");
            return Some(found);
        }
    }

    tracing::trace!(time_ms, reach, "No entry active");
    None
}
