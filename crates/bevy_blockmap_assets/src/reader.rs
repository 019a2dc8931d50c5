//! Whole-file text reads for map and tileset sources.

use std::path::Path;

use bevy::prelude::*;

/// Read the full text content of `path`.
///
/// Returns `None` when the path does not exist, is not a regular file, or cannot be
/// read as UTF-8. Callers decide whether missing data is fatal.
pub fn read_text(path: &Path) -> Option<String> {
    if !path.is_file() {
        debug!("No readable file at {}", path.display());
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            debug!("Failed to read {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "line one\nline two").unwrap();

        assert_eq!(read_text(&path).as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_text(&dir.path().join("nope.txt")).is_none());
    }

    #[test]
    fn test_directory_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_text(dir.path()).is_none());
    }
}
