//! Danmaku Timeline - fires word occurrences as the clock reaches them
//!
//! Occurrences are sorted by start time and consumed through a read
//! position. Each [`update`](DanmakuTimeline::update) returns the items whose
//! start has been reached since the previous tick.
//!
//! A clock that moves backwards, jumps forward further than the configured
//! threshold, or is already running when the items are loaded does not
//! replay everything in between: the read position is moved to the new time
//! by binary search and only items starting exactly there fire.

use super::aggregator::{DanmakuItem, WordOccurrences};
use crate::config::DanmakuConfig;

/// Polled trigger over time-sorted danmaku items
#[derive(Debug, Clone)]
pub struct DanmakuTimeline<W> {
    items: Vec<DanmakuItem<W>>,
    /// Index of the first item not yet fired
    position: usize,
    current_time: i64,
    /// Loaded while the clock was running; next tick relocates
    relocate_pending: bool,
    jump_threshold_ms: i64,
}

impl<W> Default for DanmakuTimeline<W> {
    fn default() -> Self {
        Self::with_config(&DanmakuConfig::default())
    }
}

impl<W> DanmakuTimeline<W> {
    pub fn new(jump_threshold_ms: i64) -> Self {
        Self {
            items: Vec::new(),
            position: 0,
            current_time: 0,
            relocate_pending: false,
            jump_threshold_ms,
        }
    }

    pub fn with_config(config: &DanmakuConfig) -> Self {
        Self::new(config.jump_threshold_ms)
    }

    /// Replace all items. The clock position is kept.
    pub fn load(&mut self, mut items: Vec<DanmakuItem<W>>) {
        items.sort_by_key(|item| item.span.start);
        self.items = items;
        self.position = 0;
        self.relocate_pending = self.current_time != 0;

        tracing::debug!(
            items = self.items.len(),
            time_ms = self.current_time,
            "Danmaku timeline loaded"
        );
    }

    /// Flatten word occurrences into one item per range and load them
    pub fn load_occurrences(&mut self, occurrences: &[WordOccurrences<W>])
    where
        W: Clone,
    {
        let items = occurrences
            .iter()
            .flat_map(|occurrence| {
                occurrence
                    .ranges
                    .iter()
                    .map(|span| DanmakuItem::new(occurrence.word.clone(), *span))
            })
            .collect();
        self.load(items);
    }

    /// Advance the clock to `time_ms` and return the items that fire
    pub fn update(&mut self, time_ms: i64) -> &[DanmakuItem<W>] {
        let previous = self.current_time;
        self.current_time = time_ms;

        let jumped =
            time_ms < previous || time_ms.saturating_sub(previous) > self.jump_threshold_ms;
        if self.relocate_pending || jumped {
            self.relocate_pending = false;
            self.position = self.items.partition_point(|item| item.span.start < time_ms);
            tracing::trace!(
                from = previous,
                to = time_ms,
                position = self.position,
                "Danmaku relocated"
            );
        }

        let first = self.position;
        let remaining = self.items.get(first..).unwrap_or(&[]);
        self.position += remaining.partition_point(|item| item.span.start <= time_ms);

        self.items.get(first..self.position).unwrap_or(&[])
    }

    /// Rewind to the start, keeping the items
    pub fn reset(&mut self) {
        self.position = 0;
        self.current_time = 0;
        self.relocate_pending = false;
    }

    /// Drop all items and rewind
    pub fn clear(&mut self) {
        self.items.clear();
        self.reset();
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Items fired or skipped so far
    pub fn processed(&self) -> usize {
        self.position
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    pub fn items(&self) -> &[DanmakuItem<W>] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Span;

    fn timeline(starts: &[(i64, &'static str)]) -> DanmakuTimeline<&'static str> {
        let mut tl = DanmakuTimeline::new(2000);
        tl.load(
            starts
                .iter()
                .map(|&(start, word)| DanmakuItem::new(word, Span::new(start, start + 500)))
                .collect(),
        );
        tl
    }

    fn fired(tl: &mut DanmakuTimeline<&'static str>, time_ms: i64) -> Vec<&'static str> {
        tl.update(time_ms).iter().map(|item| item.word).collect()
    }

    #[test]
    fn test_playback_fires_in_order() {
        let mut tl = timeline(&[(1200, "b"), (100, "a"), (1300, "c"), (2500, "d")]);

        assert!(fired(&mut tl, 50).is_empty());
        assert_eq!(fired(&mut tl, 150), vec!["a"]);
        assert_eq!(fired(&mut tl, 1300), vec!["b", "c"]);
        assert!(fired(&mut tl, 1350).is_empty());
        assert_eq!(fired(&mut tl, 2600), vec!["d"]);
        assert_eq!(tl.processed(), 4);
        assert_eq!(tl.total(), 4);
    }

    #[test]
    fn test_items_between_ticks_are_not_skipped() {
        let mut tl = timeline(&[(1000, "early"), (1120, "between")]);

        assert_eq!(fired(&mut tl, 1000), vec!["early"]);
        assert_eq!(fired(&mut tl, 1150), vec!["between"]);
    }

    #[test]
    fn test_forward_jump_skips_intermediate_items() {
        let mut tl = timeline(&[(1000, "a"), (3000, "b"), (10_000, "c"), (10_050, "d")]);

        assert_eq!(fired(&mut tl, 1000), vec!["a"]);
        // Beyond the threshold: treated as a seek
        assert_eq!(fired(&mut tl, 10_000), vec!["c"]);
        assert_eq!(fired(&mut tl, 10_100), vec!["d"]);
    }

    #[test]
    fn test_small_forward_step_is_playback() {
        let mut tl = timeline(&[(1000, "a"), (2500, "b")]);

        assert_eq!(fired(&mut tl, 900), Vec::<&str>::new());
        // 1900ms step stays under the threshold
        assert_eq!(fired(&mut tl, 2800), vec!["a", "b"]);
    }

    #[test]
    fn test_backward_seek_refires() {
        let mut tl = timeline(&[(1000, "a"), (1500, "b")]);

        assert_eq!(fired(&mut tl, 1600), vec!["a", "b"]);
        assert!(fired(&mut tl, 900).is_empty());
        assert_eq!(tl.processed(), 0);
        assert_eq!(fired(&mut tl, 1100), vec!["a"]);
    }

    #[test]
    fn test_loaded_mid_playback() {
        let mut tl: DanmakuTimeline<&str> = DanmakuTimeline::new(2000);
        tl.update(4000);

        tl.load(vec![
            DanmakuItem::new("past", Span::new(1000, 1500)),
            DanmakuItem::new("now", Span::new(4100, 4200)),
        ]);
        // First tick relocates instead of replaying the past
        assert!(tl.update(4050).is_empty());
        assert_eq!(tl.processed(), 1);
        assert_eq!(tl.update(4150).len(), 1);
    }

    #[test]
    fn test_loaded_before_playback() {
        let mut tl = timeline(&[(0, "zero"), (20, "twenty")]);

        assert_eq!(fired(&mut tl, 0), vec!["zero"]);
        assert_eq!(fired(&mut tl, 50), vec!["twenty"]);
    }

    #[test]
    fn test_reset_and_clear() {
        let mut tl = timeline(&[(100, "a")]);
        fired(&mut tl, 200);

        tl.reset();
        assert_eq!(tl.processed(), 0);
        assert_eq!(tl.current_time(), 0);
        assert_eq!(tl.total(), 1);
        assert_eq!(fired(&mut tl, 200), vec!["a"]);

        tl.clear();
        assert_eq!(tl.total(), 0);
        assert!(fired(&mut tl, 300).is_empty());
    }

    #[test]
    fn test_load_occurrences() {
        let mut tl = DanmakuTimeline::default();
        tl.load_occurrences(&[
            WordOccurrences::new("run", vec![Span::new(3000, 3200), Span::new(500, 900)]),
            WordOccurrences::new("walk", vec![Span::new(1000, 1100)]),
        ]);

        let order: Vec<_> = tl.items().iter().map(|item| item.word).collect();
        assert_eq!(order, vec!["run", "walk", "run"]);
        assert_eq!(tl.update(1000).len(), 2);
    }
}
