//! Cueline Sync Engine
//!
//! Answers "which entry is showing at time t" for a clock polled tens of
//! times per second:
//!
//! - **timeline**: Entries plus the structures derived from them at load time
//! - **cursor**: previous/current/next window that answers most polls in O(1)
//! - **recovery**: bucket-index scan used when the window cannot answer
//! - **track**: [`CaptionTrack`], the engine consumers hold
//! - **loader**: JSON entry and word files
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Poll Path:
//!   t → window hit? ──yes──→ entry
//!          │ no
//!          ↓
//!       recovery (buckets t, t-1s, … t-max_span) → re-centre window → entry
//! ```
//!
//! # Example
//!
//! ```rust
//! use cueline::engine::CaptionTrack;
//! use cueline::index::Entry;
//!
//! let mut track = CaptionTrack::from_entries(vec![
//!     Entry::new(0, 1000, "A"),
//!     Entry::new(1000, 2000, "B"),
//!     Entry::new(5000, 6000, "C"),
//! ]);
//!
//! assert_eq!(track.advance(500).map(|e| e.payload), Some("A"));
//! assert_eq!(track.advance(1000).map(|e| e.payload), Some("B"));
//! assert_eq!(track.advance(3000).map(|e| e.payload), None);
//! assert_eq!(track.seek_to(5500), Some(2));
//! ```

pub mod cursor;
pub mod error;
pub mod loader;
pub mod recovery;
pub mod timeline;
pub mod track;

// Re-export commonly used types
pub use cursor::{CursorState, Direction, SequentialCursor, SyncStats};
pub use error::{SyncError, SyncResult};
pub use loader::{load_entries, load_words};
pub use timeline::{validate_entries, Timeline};
pub use track::CaptionTrack;
