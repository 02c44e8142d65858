//! Engine error types
//!
//! Lookups never fail. These errors cover the fallible edges around the
//! engine: strict validation of incoming entries and loading entry or word
//! files from disk.

use thiserror::Error;

/// Errors that can occur around the synchronization engine
#[derive(Error, Debug)]
pub enum SyncError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Entry ends before it starts
    #[error("Invalid entry #{index}: end {end} is before start {start}")]
    InvalidEntry { index: usize, start: i64, end: i64 },

    /// Entry starts before its predecessor
    #[error("Entry #{index} starts at {start}, before the previous entry at {previous_start}")]
    Unsorted {
        index: usize,
        start: i64,
        previous_start: i64,
    },
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

/// Result type alias for engine operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::InvalidEntry {
            index: 3,
            start: 2000,
            end: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Invalid entry #3: end 1000 is before start 2000"
        );

        let err = SyncError::Unsorted {
            index: 1,
            start: 500,
            previous_start: 900,
        };
        assert_eq!(
            err.to_string(),
            "Entry #1 starts at 500, before the previous entry at 900"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: SyncError = json_err.into();
        assert!(matches!(err, SyncError::Serialization(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SyncError = io_err.into();
        assert!(matches!(err, SyncError::Io(_)));
    }
}
