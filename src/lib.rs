//! # Cueline
//!
//! Time-indexed caption synchronization - resolves which subtitle line (or
//! which set of vocabulary words) is active at a polled playback time.
//!
//! ## Features
//!
//! - **O(1) playback**: a previous/current/next window answers almost every
//!   poll of a forward-moving clock without a search
//! - **Fast seeks**: one-second bucket index bounds recovery to the longest
//!   entry's span
//! - **Overlap aware**: bilingual cue pairs and nested narration lines
//!   resolve deterministically (latest start wins, list order breaks ties)
//! - **Danmaku**: per-second word maps and a seek-tolerant word trigger
//!
//! ## Modules
//!
//! - [`timecode`]: SRT/WebVTT timecode parsing
//! - [`index`]: Entries, spans and the bucket index
//! - [`engine`]: Cursor, seek recovery and the [`CaptionTrack`] engine
//! - [`danmaku`]: Word-overlay aggregation and triggering
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use cueline::{CaptionTrack, Entry};
//!
//! let mut track = CaptionTrack::from_entries(vec![
//!     Entry::from_timecodes("00:00:01,000", "00:00:02,000", "Hello"),
//!     Entry::from_timecodes("00:00:02,500", "00:00:04,000", "World"),
//! ]);
//!
//! // Poll with the player clock
//! assert_eq!(track.advance(1500).map(|e| e.payload), Some("Hello"));
//! assert_eq!(track.advance(2200).map(|e| e.payload), None);
//! assert_eq!(track.advance(3000).map(|e| e.payload), Some("World"));
//!
//! // Seek bar dragged back
//! assert_eq!(track.seek_to(1000), Some(0));
//! assert_eq!(track.next_entry_time(), Some(2500));
//! ```

pub mod config;
pub mod danmaku;
pub mod engine;
pub mod index;
pub mod timecode;

// Re-export top-level types for convenience
pub use engine::{
    load_entries, load_words, validate_entries, CaptionTrack, CursorState, Direction,
    SequentialCursor, SyncError, SyncResult, SyncStats, Timeline,
};

pub use index::{bucket_of, BucketIndex, Entry, IndexStats, Slot, Span, BUCKET_MS};

pub use danmaku::{build_danmaku_map, DanmakuItem, DanmakuMap, DanmakuTimeline, WordOccurrences};

pub use config::{Config, ConfigError, DanmakuConfig, LoggingConfig, TrackConfig};

pub use timecode::{format_millis, parse_to_millis, parse_to_seconds};
