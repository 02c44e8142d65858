//! JSON loaders for entry and word files
//!
//! Entries: `[{ "start": 0, "end": 1000, "payload": "text" }]`
//! Words: `[{ "word": "run", "ranges": [{ "start": 1200, "end": 1800 }] }]`

use super::error::SyncResult;
use crate::danmaku::WordOccurrences;
use crate::index::Entry;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a JSON array of entries
pub fn load_entries<T: DeserializeOwned>(path: &Path) -> SyncResult<Vec<Entry<T>>> {
    let reader = BufReader::new(File::open(path)?);
    let entries: Vec<Entry<T>> = serde_json::from_reader(reader)?;

    tracing::debug!("Loaded {} entries from {:?}", entries.len(), path);
    Ok(entries)
}

/// Read a JSON array of word occurrences
pub fn load_words<W: DeserializeOwned>(path: &Path) -> SyncResult<Vec<WordOccurrences<W>>> {
    let reader = BufReader::new(File::open(path)?);
    let words: Vec<WordOccurrences<W>> = serde_json::from_reader(reader)?;

    tracing::debug!("Loaded {} words from {:?}", words.len(), path);
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SyncError;
    use crate::index::Span;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_entries() {
        let file = file_with(
            r#"[{"start":0,"end":1000,"payload":"A"},{"start":1000,"end":2000,"payload":"B"}]"#,
        );

        let entries: Vec<Entry<String>> = load_entries(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], Entry::new(1000, 2000, "B".to_string()));
    }

    #[test]
    fn test_load_words() {
        let file = file_with(r#"[{"word":"run","ranges":[{"start":1200,"end":1800}]}]"#);

        let words: Vec<WordOccurrences<String>> = load_words(file.path()).unwrap();
        assert_eq!(words[0].word, "run");
        assert_eq!(words[0].ranges, vec![Span::new(1200, 1800)]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_entries::<String>(&dir.path().join("absent.json"));

        assert!(matches!(result, Err(SyncError::Io(_))));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let file = file_with(r#"[{"start":0,"payload":"no end"}]"#);
        let result = load_entries::<String>(file.path());

        assert!(matches!(result, Err(SyncError::Serialization(_))));
    }
}
