//! Danmaku overlay support
//!
//! Word occurrences floated over the video, in two shapes:
//!
//! - **aggregator**: `second → words` map read by the renderer each second
//! - **timeline**: polled trigger that fires occurrences as the clock
//!   reaches them, tolerating seeks
//!
//! Neither touches the caption cursor.

pub mod aggregator;
pub mod timeline;

pub use aggregator::{build_danmaku_map, DanmakuItem, DanmakuMap, WordOccurrences};
pub use timeline::DanmakuTimeline;
