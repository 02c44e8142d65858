//! Danmaku Aggregator - second-keyed map of word occurrences
//!
//! Maps `second → [(word, range)]` so the overlay renderer can fetch the
//! words that appear during a given second with one map lookup.
//!
//! # Example
//! ```text
//! "run" at [1.2s..1.8s] and [61.0s..61.5s]
//!
//! {
//!    1: [("run", 1200..=1800)],
//!   61: [("run", 61000..=61500)],
//! }
//! ```
//!
//! # Design Notes
//! - Keyed by the floor of each range's start second
//! - First-seen order kept within a second
//! - One item per (word, second): a word repeated inside the same second
//!   is shown once

use crate::index::{bucket_of, Span};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// A word and every time range it occurs in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordOccurrences<W> {
    pub word: W,
    pub ranges: Vec<Span>,
}

impl<W> WordOccurrences<W> {
    pub fn new(word: W, ranges: Vec<Span>) -> Self {
        Self { word, ranges }
    }
}

/// One occurrence of a word, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanmakuItem<W> {
    pub word: W,
    pub span: Span,
}

impl<W> DanmakuItem<W> {
    pub fn new(word: W, span: Span) -> Self {
        Self { word, span }
    }
}

/// `second → items` produced by [`build_danmaku_map`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DanmakuMap<W> {
    seconds: BTreeMap<i64, Vec<DanmakuItem<W>>>,
}

impl<W> Default for DanmakuMap<W> {
    fn default() -> Self {
        Self {
            seconds: BTreeMap::new(),
        }
    }
}

impl<W> DanmakuMap<W> {
    /// Items whose range starts during `second`
    pub fn at_second(&self, second: i64) -> &[DanmakuItem<W>] {
        self.seconds.get(&second).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Items whose range starts during the second containing `time_ms`
    pub fn at_time(&self, time_ms: i64) -> &[DanmakuItem<W>] {
        self.at_second(bucket_of(time_ms))
    }

    /// Seconds holding at least one item, ascending
    pub fn seconds(&self) -> impl Iterator<Item = i64> + '_ {
        self.seconds.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &[DanmakuItem<W>])> + '_ {
        self.seconds
            .iter()
            .map(|(second, items)| (*second, items.as_slice()))
    }

    /// Number of non-empty seconds
    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    pub fn item_count(&self) -> usize {
        self.seconds.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }
}

/// Group every occurrence range by the second it starts in
pub fn build_danmaku_map<W>(occurrences: &[WordOccurrences<W>]) -> DanmakuMap<W>
where
    W: Clone + Eq + Hash,
{
    let mut map = DanmakuMap::default();
    let mut seen: HashSet<(&W, i64)> = HashSet::new();

    for occurrence in occurrences {
        for span in &occurrence.ranges {
            let second = bucket_of(span.start);
            if !seen.insert((&occurrence.word, second)) {
                continue;
            }

            map.seconds
                .entry(second)
                .or_insert_with(Vec::new)
                .push(DanmakuItem::new(occurrence.word.clone(), *span));
        }
    }

    tracing::debug!(
        words = occurrences.len(),
        seconds = map.len(),
        items = map.item_count(),
        "Built danmaku map"
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[(&'static str, &[(i64, i64)])]) -> Vec<WordOccurrences<&'static str>> {
        list.iter()
            .map(|&(word, ranges)| {
                WordOccurrences::new(
                    word,
                    ranges.iter().map(|&(s, e)| Span::new(s, e)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_word_two_ranges() {
        let map = build_danmaku_map(&words(&[("run", &[(1200, 1800), (61_000, 61_500)])]));

        assert_eq!(map.seconds().collect::<Vec<_>>(), vec![1, 61]);
        assert_eq!(
            map.at_second(1),
            &[DanmakuItem::new("run", Span::new(1200, 1800))]
        );
        assert_eq!(map.at_second(61).len(), 1);
        assert!(map.at_second(0).is_empty());
        assert!(map.at_second(60).is_empty());
    }

    #[test]
    fn test_same_second_deduplicated() {
        let map = build_danmaku_map(&words(&[
            ("run", &[(1100, 1300), (1700, 1900)]),
            ("walk", &[(1500, 1600)]),
            ("run", &[(1950, 2500)]),
        ]));

        let second: Vec<_> = map.at_second(1).iter().map(|item| item.word).collect();
        assert_eq!(second, vec!["run", "walk"]);
        // First occurrence kept
        assert_eq!(map.at_second(1)[0].span, Span::new(1100, 1300));
        assert_eq!(map.item_count(), 2);
    }

    #[test]
    fn test_order_follows_input() {
        let map = build_danmaku_map(&words(&[
            ("zebra", &[(5000, 5100)]),
            ("apple", &[(5900, 6000)]),
        ]));

        let order: Vec<_> = map.at_time(5500).iter().map(|item| item.word).collect();
        assert_eq!(order, vec!["zebra", "apple"]);
    }

    #[test]
    fn test_key_is_start_second_only() {
        // Long range still lands in its start second alone
        let map = build_danmaku_map(&words(&[("long", &[(3999, 9000)])]));

        assert_eq!(map.len(), 1);
        assert_eq!(map.at_time(3000).len(), 1);
        assert!(map.at_time(4000).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let map = build_danmaku_map::<&str>(&[]);

        assert!(map.is_empty());
        assert_eq!(map.item_count(), 0);
        assert!(map.at_second(0).is_empty());
    }

    #[test]
    fn test_serialize_as_plain_map() {
        let map = build_danmaku_map(&words(&[("run", &[(1200, 1800)])]));
        let json = serde_json::to_value(&map).unwrap();

        assert_eq!(json["1"][0]["word"], "run");
        assert_eq!(json["1"][0]["span"]["start"], 1200);
    }
}
